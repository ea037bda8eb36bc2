pub mod attendance;
pub mod classroom;
