use std::{
    fs::File,
    io::{BufWriter, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use crate::{ConvError, ConvResult};

/// Keeps the most recently written files open for appending.
///
/// When the cache is full the least recently used file is flushed and closed.
/// A file opened again later is reopened in append mode, so nothing written
/// before the eviction is lost.
pub struct FileCache {
    lru: lru::LruCache<PathBuf, BufWriter<File>>,
    opened: usize,
}

impl FileCache {
    pub fn with_capacity(cap: NonZeroUsize) -> Self {
        Self {
            lru: lru::LruCache::new(cap),
            opened: 0,
        }
    }

    /// Get the writer of `path`, opening the file if it is not cached.
    ///
    /// # Note
    /// This method will **update** the lru list.
    pub fn get(&mut self, path: &Path) -> ConvResult<&mut BufWriter<File>> {
        let key = path.to_path_buf();
        if !self.lru.contains(&key) {
            let f = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| ConvError::open(path, e))?;
            self.opened += 1;
            if let Some((evicted, mut writer)) = self.lru.push(key.clone(), BufWriter::new(f))
            {
                log::debug!("close {}", evicted.display());
                writer.flush()?;
            }
        }
        self.lru
            .get_mut(&key)
            .ok_or_else(|| ConvError::invalid_arg("file cache lost a fresh entry"))
    }

    pub fn len(&self) -> usize {
        self.lru.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lru.is_empty()
    }

    /// Total number of `open` calls made so far.
    pub fn opened(&self) -> usize {
        self.opened
    }

    /// Flush and close every cached file.
    pub fn close_all(&mut self) -> ConvResult<()> {
        while let Some((_, mut writer)) = self.lru.pop_lru() {
            writer.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::{io::Write, num::NonZeroUsize};

    use super::FileCache;

    #[test]
    fn general_test() {
        let dir = tempfile::tempdir().unwrap();
        let p = |name: &str| dir.path().join(name);
        let mut cache = FileCache::with_capacity(NonZeroUsize::new(2).unwrap());
        assert!(cache.is_empty());
        cache.get(&p("1")).unwrap().write_all(b"a").unwrap(); // 1
        cache.get(&p("2")).unwrap().write_all(b"b").unwrap(); // 2, 1
        cache.get(&p("1")).unwrap().write_all(b"c").unwrap(); // 1, 2
        assert_eq!(cache.opened(), 2);
        cache.get(&p("3")).unwrap().write_all(b"d").unwrap(); // 3, 1
        assert_eq!(cache.len(), 2);
        // 2 got evicted and flushed
        assert_eq!(std::fs::read(p("2")).unwrap(), b"b");
        cache.get(&p("2")).unwrap().write_all(b"e").unwrap(); // 2, 3
        assert_eq!(cache.opened(), 4);
        cache.close_all().unwrap();
        assert!(cache.is_empty());
        assert_eq!(std::fs::read(p("1")).unwrap(), b"ac");
        assert_eq!(std::fs::read(p("2")).unwrap(), b"be");
        assert_eq!(std::fs::read(p("3")).unwrap(), b"d");
    }
}
