//! In-memory filesystem for driving the sizer in tests.

#![allow(dead_code)]

use dirsizer::{BoxError, Context, FileSystem, Listing};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DirId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FileId(pub usize);

#[derive(Default)]
struct DirNode {
    dirs: Vec<DirId>,
    files: Vec<FileId>,
}

/// Tree of directories and sized files with injectable failures and delays.
///
/// Tracks how many calls are currently running (`in_flight`) so tests can check that nothing is
/// still executing after `Sizer::size` returns.
pub struct MemFs {
    dirs: Vec<DirNode>,
    sizes: Vec<u64>,
    failing_dirs: HashSet<DirId>,
    failing_files: HashSet<FileId>,
    list_delay: Option<Duration>,
    stat_delay: Option<Duration>,
    list_calls: AtomicUsize,
    stat_calls: AtomicUsize,
    in_flight: AtomicUsize,
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MemFs {
    pub const ROOT: DirId = DirId(0);

    pub fn new() -> Self {
        Self {
            dirs: vec![DirNode::default()],
            sizes: Vec::new(),
            failing_dirs: HashSet::new(),
            failing_files: HashSet::new(),
            list_delay: None,
            stat_delay: None,
            list_calls: AtomicUsize::new(0),
            stat_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn dir(&mut self, parent: DirId) -> DirId {
        let id = DirId(self.dirs.len());
        self.dirs.push(DirNode::default());
        self.dirs[parent.0].dirs.push(id);
        id
    }

    pub fn file(&mut self, parent: DirId, size: u64) -> FileId {
        let id = FileId(self.sizes.len());
        self.sizes.push(size);
        self.dirs[parent.0].files.push(id);
        id
    }

    pub fn fail_listing(&mut self, dir: DirId) {
        self.failing_dirs.insert(dir);
    }

    pub fn fail_stat(&mut self, file: FileId) {
        self.failing_files.insert(file);
    }

    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = Some(delay);
        self
    }

    pub fn with_stat_delay(mut self, delay: Duration) -> Self {
        self.stat_delay = Some(delay);
        self
    }

    pub fn total_size(&self) -> u64 {
        self.sizes.iter().sum()
    }

    pub fn file_count(&self) -> u64 {
        self.sizes.len() as u64
    }

    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn stat_calls(&self) -> usize {
        self.stat_calls.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl FileSystem for MemFs {
    type Dir = DirId;
    type File = FileId;

    fn list_children(&self, ctx: &Context, dir: &DirId) -> Result<Listing<DirId, FileId>, BoxError> {
        let _guard = InFlight::enter(&self.in_flight);
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        ctx.check()?;
        if let Some(delay) = self.list_delay {
            ctx.sleep(delay)?;
        }
        if self.failing_dirs.contains(dir) {
            return Err(format!("permission denied: {:?}", dir).into());
        }
        let node = &self.dirs[dir.0];
        Ok(Listing {
            dirs: node.dirs.clone(),
            files: node.files.clone(),
        })
    }

    fn stat_size(&self, ctx: &Context, file: &FileId) -> Result<u64, BoxError> {
        let _guard = InFlight::enter(&self.in_flight);
        self.stat_calls.fetch_add(1, Ordering::SeqCst);
        ctx.check()?;
        if let Some(delay) = self.stat_delay {
            ctx.sleep(delay)?;
        }
        if self.failing_files.contains(file) {
            return Err(format!("stat failed: {:?}", file).into());
        }
        Ok(self.sizes[file.0])
    }
}

/// Deterministic pseudo-random tree: `dirs` directories attached to random earlier directories,
/// `files` files of random size in random directories.
pub fn random_tree(seed: u64, dirs: usize, files: usize) -> MemFs {
    let mut rng = Lcg(seed);
    let mut fs = MemFs::new();
    let mut all = vec![MemFs::ROOT];
    for _ in 0..dirs {
        let parent = all[rng.below(all.len())];
        all.push(fs.dir(parent));
    }
    for _ in 0..files {
        let parent = all[rng.below(all.len())];
        fs.file(parent, rng.next() % 10_000);
    }
    fs
}

struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}
