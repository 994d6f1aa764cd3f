//! Library-level integration tests over realistic page-builder markup.

mod chat_widgets;
mod elementor_page;
