pub mod db;
pub mod supabase_auth;
pub mod twilio;

pub use db::DbAdapter;
pub use supabase_auth::SupabaseAuthAdapter;
pub use twilio::TwilioReceiptAdapter;
