//! Versioned test tree walker
//!
//! A test tree is either a single test directory (it has its own descriptor),
//! a directory of test directories, or a mix where some children are split
//! suites: directories without a descriptor whose subdirectories each carry
//! one. Split suites are followed exactly one level down.
//!
//! The walk runs on its own task and streams results over a channel so
//! descriptors can be processed while the rest of the tree is still read.

use std::collections::VecDeque;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{DESCRIPTOR_FILE_NAME, WALK_CHANNEL_CAPACITY};
use crate::descriptor::error::{DescriptorError, WalkError};
use crate::descriptor::types::{TestDescriptor, parse_descriptor};

/// One test directory found by the walker
#[derive(Debug)]
pub struct WalkEntry {
    /// Directory path relative to the walked root
    pub name: String,
    pub path: PathBuf,
    pub descriptor: Result<TestDescriptor, DescriptorError>,
}

/// Item streamed by a walk. An `Err` ends the walk of its tree.
pub type WalkResult = Result<WalkEntry, WalkError>;

/// Walk `root` on a new task and return the receiving end of its results.
/// The channel closes when the walk is complete.
pub fn walk_test_dir(root: impl Into<PathBuf>) -> mpsc::Receiver<WalkResult> {
    let (sender, receiver) = mpsc::channel(WALK_CHANNEL_CAPACITY);
    spawn_walk(root.into(), sender);
    receiver
}

/// Walk `root` on a new task, sending results to `sender`.
///
/// Several walks may share one channel; it closes once every walk has
/// finished and dropped its sender.
pub fn spawn_walk(root: PathBuf, sender: mpsc::Sender<WalkResult>) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("Walking test tree {}", root.display());
        walk(&root, &sender).await;
        debug!("Finished walking test tree {}", root.display());
    })
}

/// A directory that may hold a descriptor
struct Candidate {
    dir: PathBuf,
    /// Candidates inside a split suite are not descended into
    nested: bool,
}

async fn walk(root: &Path, sender: &mpsc::Sender<WalkResult>) {
    // The root itself is a test directory
    if let Some(descriptor) = read_descriptor(root).await.transpose() {
        let entry = WalkEntry {
            name: root_name(root),
            path: root.to_path_buf(),
            descriptor,
        };
        let _ = sender.send(Ok(entry)).await;
        return;
    }

    let children = match list_dirs(root).await {
        Ok(children) => children,
        Err(source) => {
            let _ = sender
                .send(Err(WalkError::ReadDir {
                    path: root.to_path_buf(),
                    source,
                }))
                .await;
            return;
        }
    };

    let mut worklist: VecDeque<Candidate> = children
        .into_iter()
        .map(|dir| Candidate { dir, nested: false })
        .collect();

    while let Some(candidate) = worklist.pop_front() {
        let descriptor = match read_descriptor(&candidate.dir).await {
            Ok(Some(descriptor)) => Ok(descriptor),
            Ok(None) if !candidate.nested => match list_dirs(&candidate.dir).await {
                Ok(suites) if !suites.is_empty() => {
                    debug!(
                        "{} has no {}, treating it as a split suite",
                        candidate.dir.display(),
                        DESCRIPTOR_FILE_NAME
                    );
                    // Front of the queue keeps the walk in sorted path order
                    for dir in suites.into_iter().rev() {
                        worklist.push_front(Candidate { dir, nested: true });
                    }
                    continue;
                }
                Ok(_) => Err(missing(&candidate.dir)),
                Err(source) => Err(DescriptorError::Read {
                    path: candidate.dir.clone(),
                    source,
                }),
            },
            Ok(None) => Err(missing(&candidate.dir)),
            Err(e) => Err(e),
        };

        let entry = WalkEntry {
            name: relative_name(root, &candidate.dir),
            path: candidate.dir,
            descriptor,
        };
        if sender.send(Ok(entry)).await.is_err() {
            debug!("Walk receiver dropped, stopping walk of {}", root.display());
            return;
        }
    }
}

/// Read and decode the descriptor of `dir`. `Ok(None)` when there is none.
async fn read_descriptor(dir: &Path) -> Result<Option<TestDescriptor>, DescriptorError> {
    let path = dir.join(DESCRIPTOR_FILE_NAME);
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(DescriptorError::Read { path, source }),
    };

    parse_descriptor(&content)
        .map(Some)
        .map_err(|source| DescriptorError::Decode { path, source })
}

/// Subdirectories of `dir`, sorted by path. Symlinks to directories are
/// followed; children that cannot be inspected are skipped.
async fn list_dirs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut dirs = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        match is_dir_entry(&entry).await {
            Ok(true) => dirs.push(path),
            Ok(false) => {}
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    dirs.sort();
    Ok(dirs)
}

async fn is_dir_entry(entry: &tokio::fs::DirEntry) -> std::io::Result<bool> {
    let file_type = entry.file_type().await?;
    if file_type.is_symlink() {
        return Ok(tokio::fs::metadata(entry.path()).await?.is_dir());
    }
    Ok(file_type.is_dir())
}

fn missing(dir: &Path) -> DescriptorError {
    DescriptorError::Missing {
        dir: dir.to_path_buf(),
    }
}

fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

fn relative_name(root: &Path, dir: &Path) -> String {
    dir.strip_prefix(root)
        .unwrap_or(dir)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
