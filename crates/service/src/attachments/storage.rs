use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("invalid locator: {0}")]
    InvalidLocator(String),
    #[error("storage misconfigured: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("remote store error: {0}")]
    Remote(String),
}

/// Physical byte store for supporting files.
///
/// `store` returns an opaque locator; `delete` takes that locator back and
/// reports `NotFound` when the object is already gone.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn kind(&self) -> &'static str;

    async fn store(&self, key: &str, bytes: &[u8], content_type: Option<&str>) -> Result<String, StorageError>;

    async fn delete(&self, locator: &str) -> Result<(), StorageError>;
}

/// Final path component of a client supplied file name.
pub fn display_name(file_name: &str) -> &str {
    file_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(file_name)
        .trim()
}

fn sanitise(file_name: &str) -> String {
    let cleaned: String = display_name(file_name)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() { "file".to_string() } else { cleaned.to_string() }
}

/// `{service_id}/{uuid}_{name}`: unique per upload, grouped per service.
pub fn storage_key(service_id: Uuid, file_name: &str) -> String {
    format!("{}/{}_{}", service_id, Uuid::new_v4(), sanitise(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_scoped_and_unique() {
        let sid = Uuid::new_v4();
        let a = storage_key(sid, "report.pdf");
        let b = storage_key(sid, "report.pdf");
        assert_ne!(a, b);
        assert!(a.starts_with(&format!("{sid}/")));
        assert!(a.ends_with("_report.pdf"));
    }

    #[test]
    fn key_strips_directories_and_odd_chars() {
        let sid = Uuid::new_v4();
        let key = storage_key(sid, "../../etc/pass wd");
        assert!(key.ends_with("_pass_wd"));
        assert_eq!(key.matches('/').count(), 1);
        assert!(storage_key(sid, "C:\\docs\\tax.xlsx").ends_with("_tax.xlsx"));
        assert!(storage_key(sid, "...").ends_with("_file"));
    }

    #[test]
    fn display_name_keeps_uploaded_spelling() {
        assert_eq!(display_name("dir/My File.pdf"), "My File.pdf");
        assert_eq!(display_name("plain.txt"), "plain.txt");
    }
}
