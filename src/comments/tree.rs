//! Reconstruction of reply threads from flat comment rows.
//!
//! Rows are indexed once by parent id (positions into the input, no pointer
//! graph) and the forest is then assembled with an explicit stack, so the
//! depth of a thread never bounds the call stack.

use std::collections::{HashMap, HashSet};
use std::slice;

use crate::comments::authors::AuthorDirectory;
use crate::error::{Integrity, Result};
use crate::models::{Comment, CommentWithAuthor};

/// Oldest first; equal timestamps fall back to id order.
pub fn sort_chronologically(comments: &mut [Comment]) {
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

/// Builds the reply forest of one article.
///
/// `comments` must already be in chronological order (the storage read query
/// guarantees it; see [`sort_chronologically`] otherwise). That order is kept
/// for the roots and for every `replies` list. A reply whose parent is not in
/// `comments` fails the whole thread rather than being left out.
pub fn build_tree(
    comments: Vec<Comment>,
    authors: &AuthorDirectory,
) -> Result<Vec<CommentWithAuthor>> {
    let index = ThreadIndex::new(&comments)?;
    let mut slots: Vec<Option<Comment>> = comments.into_iter().map(Some).collect();
    let mut visited = vec![false; slots.len()];
    let mut forest = Vec::with_capacity(index.roots.len());

    for &root in &index.roots {
        let mut stack = vec![index.enter(root, &mut visited)?];

        while let Some(frame) = stack.last_mut() {
            if let Some(&child) = frame.pending.next() {
                let next = index.enter(child, &mut visited)?;
                stack.push(next);
            } else if let Some(done) = stack.pop() {
                let node = done.finish(&mut slots, authors)?;
                match stack.last_mut() {
                    Some(parent) => parent.replies.push(node),
                    None => forest.push(node),
                }
            }
        }
    }

    index.check_unreachable(&visited)?;
    Ok(forest)
}

struct ThreadIndex {
    ids: Vec<i64>,
    parents: Vec<Option<i64>>,
    positions: HashMap<i64, usize>,
    roots: Vec<usize>,
    children: HashMap<i64, Vec<usize>>,
}

impl ThreadIndex {
    fn new(comments: &[Comment]) -> Result<Self> {
        let mut index = Self {
            ids: Vec::with_capacity(comments.len()),
            parents: Vec::with_capacity(comments.len()),
            positions: HashMap::with_capacity(comments.len()),
            roots: Vec::new(),
            children: HashMap::new(),
        };

        for (position, comment) in comments.iter().enumerate() {
            if index.positions.insert(comment.id, position).is_some() {
                return Err(Integrity::DuplicateComment(comment.id).into());
            }
            index.ids.push(comment.id);
            index.parents.push(comment.parent_id);

            match comment.parent_id {
                None => index.roots.push(position),
                Some(parent_id) => index.children.entry(parent_id).or_default().push(position),
            }
        }

        Ok(index)
    }

    fn enter(&self, position: usize, visited: &mut [bool]) -> Result<Frame<'_>> {
        let id = self.ids[position];
        if std::mem::replace(&mut visited[position], true) {
            return Err(Integrity::CommentCycle(id).into());
        }

        let pending = self.children.get(&id).map_or(&[][..], Vec::as_slice).iter();
        Ok(Frame {
            id,
            position,
            pending,
            replies: Vec::new(),
        })
    }

    /// Every row left unvisited either hangs off a parent that is not part of
    /// the thread or sits on (or below) a parent loop that never reaches a
    /// root. Both leave the thread malformed.
    fn check_unreachable(&self, visited: &[bool]) -> Result<()> {
        let mut unvisited = visited
            .iter()
            .enumerate()
            .filter(|(_, seen)| !**seen)
            .map(|(position, _)| position)
            .peekable();
        let Some(&first) = unvisited.peek() else {
            return Ok(());
        };

        for position in unvisited {
            if let Some(parent_id) = self.parents[position] {
                if !self.positions.contains_key(&parent_id) {
                    return Err(Integrity::OrphanedReply {
                        comment_id: self.ids[position],
                        parent_id,
                    }
                    .into());
                }
            }
        }

        // No unvisited row has a missing parent, so following parents from
        // any of them must come back around to a row already on the path.
        let mut chain = HashSet::new();
        let mut cursor = first;
        while chain.insert(cursor) {
            match self.parents[cursor].and_then(|p| self.positions.get(&p)) {
                Some(&parent) => cursor = parent,
                None => break,
            }
        }
        Err(Integrity::CommentCycle(self.ids[cursor]).into())
    }
}

struct Frame<'a> {
    id: i64,
    position: usize,
    pending: slice::Iter<'a, usize>,
    replies: Vec<CommentWithAuthor>,
}

impl Frame<'_> {
    fn finish(
        self,
        slots: &mut [Option<Comment>],
        authors: &AuthorDirectory,
    ) -> Result<CommentWithAuthor> {
        let comment = slots[self.position]
            .take()
            .ok_or(Integrity::CommentCycle(self.id))?;
        let author = authors.author_of(&comment)?;
        Ok(CommentWithAuthor::new(comment, author, self.replies))
    }
}
