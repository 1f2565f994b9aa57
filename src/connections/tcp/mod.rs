mod tcp_connection_record;
mod tcp_connection_state;

pub use tcp_connection_record::ConnectionRecord;
pub use tcp_connection_state::ConnectionState;
