//! Teamwork resource types and their request/response pairs.

mod comment;
mod company;
mod milestone;
mod project;
mod project_member;
mod rate;
mod tag;
mod task;
mod tasklist;
mod team;
mod timelog;
mod user;

pub use comment::*;
pub use company::*;
pub use milestone::*;
pub use project::*;
pub use project_member::*;
pub use rate::*;
pub use tag::*;
pub use task::*;
pub use tasklist::*;
pub use team::*;
pub use timelog::*;
pub use user::*;
