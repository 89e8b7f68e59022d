pub mod dispatch;
pub mod distribute;
pub mod groups;
pub mod inventory;
pub mod pending;
pub mod progress;
pub mod review;
pub mod schema;
pub mod shared;
pub mod sync;
pub mod tasks;
pub mod teams;
