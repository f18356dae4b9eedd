use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use spendlog_core::{CoreError, ExpenseStorage};
use spendlog_domain::Expense;
use tracing::debug;

const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_STORE_FILE: &str = "expenses.json";

/// Single-file JSON persistence for the expense list.
#[derive(Debug, Clone)]
pub struct JsonExpenseStorage {
    path: PathBuf,
}

impl JsonExpenseStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `dir/expenses.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExpenseStorage for JsonExpenseStorage {
    fn load(&self) -> Result<Vec<Expense>, CoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
    }

    fn save_all(&self, expenses: &[Expense]) -> Result<(), CoreError> {
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &serialize_expenses(expenses)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), count = expenses.len(), "saved expense store");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn serialize_expenses(expenses: &[Expense]) -> Result<String, CoreError> {
    serde_json::to_string_pretty(expenses).map_err(|err| CoreError::Serde(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/data/expenses.json")),
            PathBuf::from("/data/expenses.json.tmp")
        );
        assert_eq!(tmp_path(Path::new("/data/store")), PathBuf::from("/data/store.tmp"));
    }
}
