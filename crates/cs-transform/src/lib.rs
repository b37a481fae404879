//! Source transformation: comment removal and minification that never
//! touches string, template or regex literals.
//!
//! Stages:
//! 1. Language classification (extension -> comment family + dialect)
//! 2. Comment removal (one state machine per family). The scanner emits
//!    every literal it passes as a placeholder, so the whitespace passes
//!    after it work on protected text without lexing again.
//! 3. Minification (family-aware whitespace collapsing)
//!
//! `protect` / `restore` are also usable on their own.

pub mod comments;
pub mod language;
pub mod lexer;
pub mod minify;
pub mod pipeline;
pub mod protect;

pub use comments::{remove_comments, remove_comments_with};
pub use language::{classify, profile, BlockDelims, CommentPlacement, LanguageProfile};
pub use minify::{minify, minify_with};
pub use pipeline::{FileOutput, TransformPipeline};
pub use protect::{protect, protect_with, restore, LiteralSyntax, ProtectedText};
