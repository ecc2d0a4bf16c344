//! Dataset categorization
//!
//! Groups the image files of a directory into categories named by the file
//! name prefix before the first `_` (`cat_001.jpg` belongs to `cat`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::retrieval::common::error::{Result, RetrievalError};

/// Name of the synthetic category spanning every image
pub const ALL_CATEGORY: &str = "All";

/// File extensions picked up by [`Dataset::scan`], compared case-insensitively
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Image files of one directory grouped by category.
///
/// Categories and the files inside them are sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    categories: BTreeMap<String, Vec<PathBuf>>,
}

impl Dataset {
    /// Lists the image files directly inside `dir`. Subdirectories are not
    /// visited.
    pub fn scan<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir)
            .map_err(|e| RetrievalError::InputReadError(format!("{}: {}", dir.display(), e)))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && is_image_file(&path) {
                files.push(path);
            }
        }

        let dataset = Self::from_files(files)?;
        info!(
            dir = %dir.display(),
            categories = dataset.categories.len(),
            images = dataset.len(),
            "Scanned dataset"
        );
        Ok(dataset)
    }

    /// Groups already known files; paths without a UTF-8 file name are ignored.
    ///
    /// Fails with [`RetrievalError::ReservedCategory`] when a file would land
    /// in a category named [`ALL_CATEGORY`].
    pub fn from_files<I: IntoIterator<Item = PathBuf>>(files: I) -> Result<Self> {
        let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for path in files {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                debug!("Ignoring {}", path.display());
                continue;
            };
            let category = category_of(name);
            if category == ALL_CATEGORY {
                return Err(RetrievalError::ReservedCategory(category.to_string()));
            }
            categories
                .entry(category.to_string())
                .or_default()
                .push(path);
        }

        for files in categories.values_mut() {
            files.sort();
        }

        Ok(Self { categories })
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.categories
            .iter()
            .map(|(name, files)| (name.as_str(), files.as_slice()))
    }

    /// Files of one category; [`ALL_CATEGORY`] yields every file.
    pub fn files(&self, category: &str) -> Vec<&Path> {
        if category == ALL_CATEGORY {
            return self.all_files();
        }
        self.categories
            .get(category)
            .map(|files| files.iter().map(PathBuf::as_path).collect())
            .unwrap_or_default()
    }

    pub fn all_files(&self) -> Vec<&Path> {
        self.categories
            .values()
            .flat_map(|files| files.iter().map(PathBuf::as_path))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Category of a file name: everything before the first `_`.
pub fn category_of(file_name: &str) -> &str {
    file_name.split('_').next().unwrap_or(file_name)
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_of() {
        assert_eq!(category_of("cat_001.jpg"), "cat");
        assert_eq!(category_of("big_cat_7.png"), "big");
        assert_eq!(category_of("lonely.jpg"), "lonely.jpg");
    }

    #[test]
    fn test_scan_groups_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["dog_2.jpg", "cat_1.PNG", "dog_1.jpeg", "notes.txt", "cat_0.png"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("bird_1.png")).unwrap();

        let dataset = Dataset::scan(dir.path()).unwrap();

        assert_eq!(dataset.category_names().collect::<Vec<_>>(), vec!["cat", "dog"]);
        assert_eq!(dataset.len(), 4);

        let dogs: Vec<_> = dataset
            .files("dog")
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(dogs, vec!["dog_1.jpeg", "dog_2.jpg"]);
        assert_eq!(dataset.files(ALL_CATEGORY).len(), 4);
        assert!(dataset.files("bird").is_empty());
    }

    #[test]
    fn test_real_all_category_is_rejected() {
        let files = ["cat_1.jpg", "All_1.jpg"].map(PathBuf::from);
        let result = Dataset::from_files(files);
        assert!(matches!(result, Err(RetrievalError::ReservedCategory(ref c)) if c == ALL_CATEGORY));

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("All_2.png"), b"").unwrap();
        assert!(matches!(
            Dataset::scan(dir.path()),
            Err(RetrievalError::ReservedCategory(_))
        ));
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = Dataset::scan(dir.path().join("nope"));
        assert!(matches!(result, Err(RetrievalError::InputReadError(_))));
    }
}
