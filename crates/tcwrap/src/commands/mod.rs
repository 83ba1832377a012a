pub mod clone;
pub mod common;
pub mod config;
pub mod configure;
pub mod coverage;
pub mod filter;
pub mod mklog;
pub mod pull;
pub mod svn;
pub mod sync_remote;

pub use clone::CloneAll;
pub use common::CommandOptions;
pub use config::Config;
pub use configure::Configure;
pub use coverage::Coverage;
pub use filter::Filter;
pub use mklog::Mklog;
pub use pull::Pull;
pub use svn::Svn;
pub use sync_remote::SyncRemote;
