use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::BlogClientResult;

/// Хранилище JWT-токена между запусками клиента.
pub trait TokenStore: Send + Sync {
    /// Читает сохранённый токен; `None`, если токена нет.
    fn load(&self) -> BlogClientResult<Option<String>>;
    /// Сохраняет токен, заменяя предыдущий.
    fn save(&self, token: &str) -> BlogClientResult<()>;
    /// Удаляет сохранённый токен. Отсутствие токена не считается ошибкой.
    fn clear(&self) -> BlogClientResult<()>;
}

#[derive(Debug, Clone)]
/// Токен в текстовом файле (по умолчанию `.blog_token`).
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Имя файла по умолчанию.
    pub const DEFAULT_FILE: &'static str = ".blog_token";

    /// Хранилище в указанном файле.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Путь к файлу токена.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILE)
    }
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> BlogClientResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(parse_token_content(&raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, token: &str) -> BlogClientResult<()> {
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> BlogClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, Default)]
/// Токен только в памяти процесса.
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Хранилище с заранее сохранённым токеном.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> BlogClientResult<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> BlogClientResult<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> BlogClientResult<()> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FileTokenStore, MemoryTokenStore, TokenStore, parse_token_content};

    #[test]
    fn parse_token_content_trims_whitespace() {
        let token = parse_token_content("  abc.def.ghi  \n");
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn parse_token_content_rejects_blank() {
        assert!(parse_token_content("   ").is_none());
    }

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("token"));

        assert_eq!(store.load().expect("load"), None);

        store.save("abc.def.ghi").expect("save");
        assert_eq!(store.load().expect("load").as_deref(), Some("abc.def.ghi"));

        store.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
        store.clear().expect("clearing twice is fine");
    }

    #[test]
    fn memory_store_starts_with_given_token() {
        let store = MemoryTokenStore::with_token("t");
        assert_eq!(store.load().expect("load").as_deref(), Some("t"));
        store.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
    }
}
