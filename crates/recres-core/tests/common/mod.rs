pub mod mirror_server;
pub mod mock_transport;
