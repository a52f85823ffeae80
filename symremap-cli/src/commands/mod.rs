pub mod documents;
pub mod rewrite;
