use crate::error::{AppError, Result};

pub type CommentId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub author: String,
    pub text: String,
    pub date: String,
    pub parent_id: Option<CommentId>,
    pub replies: Vec<Comment>,
}

impl Comment {
    fn new(id: CommentId, author: &str, text: &str, parent_id: Option<CommentId>) -> Self {
        Self {
            id,
            author: author.trim().to_string(),
            text: text.trim().to_string(),
            date: "Just now".to_string(),
            parent_id,
            replies: Vec::new(),
        }
    }
}

/// Number of comments in a forest, replies included.
pub fn count_all(comments: &[Comment]) -> usize {
    comments.iter().map(|c| 1 + count_all(&c.replies)).sum()
}

fn find_mut(comments: &mut [Comment], id: CommentId) -> Option<&mut Comment> {
    for comment in comments {
        if comment.id == id {
            return Some(comment);
        }
        if let Some(found) = find_mut(&mut comment.replies, id) {
            return Some(found);
        }
    }
    None
}

fn find(comments: &[Comment], id: CommentId) -> Option<&Comment> {
    for comment in comments {
        if comment.id == id {
            return Some(comment);
        }
        if let Some(found) = find(&comment.replies, id) {
            return Some(found);
        }
    }
    None
}

fn max_id(comments: &[Comment]) -> CommentId {
    comments
        .iter()
        .map(|c| c.id.max(max_id(&c.replies)))
        .max()
        .unwrap_or(0)
}

fn flatten_into<'a>(comments: &'a [Comment], depth: usize, out: &mut Vec<(usize, &'a Comment)>) {
    for comment in comments {
        out.push((depth, comment));
        flatten_into(&comment.replies, depth + 1, out);
    }
}

fn validate(author: &str, text: &str) -> Result<()> {
    if author.trim().is_empty() {
        return Err(AppError::InvalidInput("name is required".to_string()));
    }
    if text.trim().is_empty() {
        return Err(AppError::InvalidInput("comment is required".to_string()));
    }
    Ok(())
}

/// The discussion under one article.
///
/// Newest comments come first at every level. At most one reply composer is
/// open at a time, tracked by `active_reply`.
#[derive(Debug, Clone)]
pub struct CommentThread {
    comments: Vec<Comment>,
    next_id: CommentId,
    active_reply: Option<CommentId>,
}

impl CommentThread {
    pub fn new(comments: Vec<Comment>) -> Self {
        let next_id = max_id(&comments) + 1;
        Self {
            comments,
            next_id,
            active_reply: None,
        }
    }

    /// Thread pre-populated with the example discussion every article starts with.
    pub fn seeded() -> Self {
        let reply = Comment {
            id: 3,
            author: "Mark Johnson".to_string(),
            text: "Agreed! I shared this with my team.".to_string(),
            date: "2 days ago".to_string(),
            parent_id: Some(1),
            replies: Vec::new(),
        };
        Self::new(vec![
            Comment {
                id: 1,
                author: "Jane Doe".to_string(),
                text: "This is a fantastic analysis. Really clarifies the current state of the industry."
                    .to_string(),
                date: "2 days ago".to_string(),
                parent_id: None,
                replies: vec![reply],
            },
            Comment {
                id: 2,
                author: "John Smith".to_string(),
                text: "I have a slightly different take on this. I think the impact will be much larger than predicted."
                    .to_string(),
                date: "1 day ago".to_string(),
                parent_id: None,
                replies: Vec::new(),
            },
        ])
    }

    #[cfg(test)]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn count_all(&self) -> usize {
        count_all(&self.comments)
    }

    pub fn find(&self, id: CommentId) -> Option<&Comment> {
        find(&self.comments, id)
    }

    pub fn add_top_level_comment(&mut self, author: &str, text: &str) -> Result<CommentId> {
        validate(author, text)?;
        let id = self.allocate_id();
        self.comments.insert(0, Comment::new(id, author, text, None));
        Ok(id)
    }

    /// Prepend a reply to `parent_id`, wherever it sits in the tree.
    pub fn add_reply(&mut self, parent_id: CommentId, author: &str, text: &str) -> Result<CommentId> {
        validate(author, text)?;
        if find(&self.comments, parent_id).is_none() {
            return Err(AppError::CommentNotFound(parent_id));
        }
        let id = self.allocate_id();
        let parent = find_mut(&mut self.comments, parent_id)
            .ok_or(AppError::CommentNotFound(parent_id))?;
        parent.replies.insert(0, Comment::new(id, author, text, Some(parent_id)));
        Ok(id)
    }

    pub fn active_reply(&self) -> Option<CommentId> {
        self.active_reply
    }

    /// Open the reply composer under `id`, or close it if it is already open there.
    pub fn toggle_reply(&mut self, id: CommentId) -> Result<()> {
        if self.find(id).is_none() {
            return Err(AppError::CommentNotFound(id));
        }
        self.active_reply = match self.active_reply {
            Some(current) if current == id => None,
            _ => Some(id),
        };
        Ok(())
    }

    pub fn cancel_reply(&mut self) {
        self.active_reply = None;
    }

    /// Post the open reply and close the composer.
    pub fn submit_reply(&mut self, author: &str, text: &str) -> Result<CommentId> {
        let parent_id = self
            .active_reply
            .ok_or_else(|| AppError::InvalidInput("no reply in progress".to_string()))?;
        let id = self.add_reply(parent_id, author, text)?;
        self.active_reply = None;
        Ok(id)
    }

    /// Depth-first display order with nesting depth.
    pub fn flatten(&self) -> Vec<(usize, &Comment)> {
        let mut out = Vec::with_capacity(self.count_all());
        flatten_into(&self.comments, 0, &mut out);
        out
    }

    fn allocate_id(&mut self) -> CommentId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for CommentThread {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_thread_counts_nested_replies() {
        let thread = CommentThread::seeded();
        assert_eq!(thread.comments().len(), 2);
        assert_eq!(thread.count_all(), 3);
    }

    #[test]
    fn test_top_level_comment_is_prepended() {
        let mut thread = CommentThread::seeded();

        let id = thread.add_top_level_comment("Alex Chen", "First!").unwrap();

        assert_eq!(thread.comments()[0].id, id);
        assert_eq!(thread.comments()[0].parent_id, None);
        assert_eq!(thread.comments()[0].date, "Just now");
        assert_eq!(thread.count_all(), 4);
    }

    #[test]
    fn test_reply_to_nested_comment() {
        let mut thread = CommentThread::seeded();
        let before = thread.count_all();

        // Comment 3 is itself a reply to comment 1
        let id = thread.add_reply(3, "Priya", "Same here").unwrap();

        assert_eq!(thread.count_all(), before + 1);
        let parent = thread.find(3).unwrap();
        assert_eq!(parent.replies[0].id, id);
        assert_eq!(parent.replies[0].parent_id, Some(3));
    }

    #[test]
    fn test_reply_is_prepended_among_siblings() {
        let mut thread = CommentThread::seeded();

        let first = thread.add_reply(1, "A", "one").unwrap();
        let second = thread.add_reply(1, "B", "two").unwrap();

        let parent = thread.find(1).unwrap();
        let ids: Vec<_> = parent.replies.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![second, first, 3]);
    }

    #[test]
    fn test_reply_to_missing_parent_leaves_tree_unchanged() {
        let mut thread = CommentThread::seeded();
        let snapshot = thread.comments().to_vec();

        let result = thread.add_reply(999, "Ghost", "Hello?");

        assert!(matches!(result, Err(AppError::CommentNotFound(999))));
        assert_eq!(thread.comments(), snapshot.as_slice());
    }

    #[test]
    fn test_blank_fields_are_rejected() {
        let mut thread = CommentThread::seeded();

        assert!(matches!(
            thread.add_top_level_comment("   ", "text"),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            thread.add_reply(1, "Name", "\n\t"),
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(thread.count_all(), 3);
    }

    #[test]
    fn test_ids_never_collide_with_seed() {
        let mut thread = CommentThread::seeded();
        let id = thread.add_top_level_comment("A", "B").unwrap();
        assert_eq!(id, 4);
    }

    #[test]
    fn test_single_active_reply() {
        let mut thread = CommentThread::seeded();

        thread.toggle_reply(1).unwrap();
        assert_eq!(thread.active_reply(), Some(1));

        thread.toggle_reply(2).unwrap();
        assert_eq!(thread.active_reply(), Some(2));

        thread.toggle_reply(2).unwrap();
        assert_eq!(thread.active_reply(), None);

        assert!(thread.toggle_reply(42).is_err());
        assert_eq!(thread.active_reply(), None);
    }

    #[test]
    fn test_submit_reply_closes_composer() {
        let mut thread = CommentThread::seeded();
        thread.toggle_reply(2).unwrap();

        let id = thread.submit_reply("Sam", "Good point").unwrap();

        assert_eq!(thread.active_reply(), None);
        assert_eq!(thread.find(2).unwrap().replies[0].id, id);
    }

    #[test]
    fn test_submit_without_open_composer_fails() {
        let mut thread = CommentThread::seeded();
        assert!(thread.submit_reply("Sam", "Hi").is_err());
    }

    #[test]
    fn test_flatten_depth_first() {
        let thread = CommentThread::seeded();
        let flat: Vec<_> = thread.flatten().into_iter().map(|(d, c)| (d, c.id)).collect();
        assert_eq!(flat, vec![(0, 1), (1, 3), (0, 2)]);
    }

    #[test]
    fn test_count_all_empty() {
        assert_eq!(count_all(&[]), 0);
        assert_eq!(CommentThread::new(Vec::new()).count_all(), 0);
    }
}
