pub mod counters;
pub mod db;
pub mod gateway;
pub mod notify;
pub mod shipping;
