pub mod github;
pub mod local_git;
pub mod traits;
