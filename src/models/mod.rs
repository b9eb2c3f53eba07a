mod article;
mod comment;
mod poll;

pub use article::{AppView, Article, Category, FactCheck, SortOrder, Verdict};
pub use comment::{CommentId, CommentThread};
pub use poll::{Poll, PollState};

#[cfg(test)]
pub use poll::PollOption;
