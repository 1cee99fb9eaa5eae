//! Depth-bounded listing recursion shared by every access

use crate::access::ListOptions;
use crate::file::BasicFile;
use crate::filter::FileFilter;

/// A tree of entries that can be walked by [`collect`].
pub(crate) trait EntryTree {
    type Entry;

    fn is_dir(&self, entry: &Self::Entry) -> bool;

    /// Immediate children, in the store's enumeration order.
    fn children(&self, entry: &Self::Entry) -> Vec<Self::Entry>;

    fn describe(&self, entry: &Self::Entry) -> BasicFile;

    /// Hidden-entry policy, applied to everything below the starting entry.
    fn shows(&self, _entry: &Self::Entry, _include_hidden: bool) -> bool {
        true
    }
}

/// Walk `tree` from `start`.
///
/// A directory is included when `include_dirs` is set and it passes the
/// filter; its children are visited while the remaining depth is not zero.
/// A file is included when it passes the filter.
pub(crate) fn collect<T: EntryTree>(
    tree: &T,
    start: T::Entry,
    filter: &dyn FileFilter,
    options: ListOptions,
) -> Vec<BasicFile> {
    let mut found = Vec::new();
    visit(tree, start, filter, options, options.max_depth, &mut found);
    found
}

fn visit<T: EntryTree>(
    tree: &T,
    entry: T::Entry,
    filter: &dyn FileFilter,
    options: ListOptions,
    remaining: Option<u32>,
    found: &mut Vec<BasicFile>,
) {
    if tree.is_dir(&entry) {
        if options.include_dirs {
            let file = tree.describe(&entry);
            if filter.accept(&file) {
                found.push(file);
            }
        }
        if remaining == Some(0) {
            return;
        }
        let next = remaining.map(|depth| depth - 1);
        for child in tree.children(&entry) {
            if tree.shows(&child, options.include_hidden) {
                visit(tree, child, filter, options, next, found);
            }
        }
    } else {
        let file = tree.describe(&entry);
        if filter.accept(&file) {
            found.push(file);
        }
    }
}
