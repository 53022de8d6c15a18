pub mod heartbeat;
pub mod supabase;
