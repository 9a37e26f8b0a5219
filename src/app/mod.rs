pub mod dispatch;
mod edit_loop;
mod style;
