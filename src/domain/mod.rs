mod new_signup;
mod stage;
mod waitlist_email;
// allow external `use` statements to skip `new_signup` etc
pub use new_signup::NewSignup;
pub use stage::Stage;
pub use waitlist_email::WaitlistEmail;
