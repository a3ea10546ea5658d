pub mod dispatch;
pub mod install;
pub mod locate;
pub mod run;
pub mod status;
