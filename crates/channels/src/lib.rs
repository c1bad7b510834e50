//! Outbound delivery providers: WhatsApp messaging and automated calling.

pub mod calling;
pub mod phone;
pub mod whatsapp;

pub use calling::CallingProvider;
pub use whatsapp::WhatsAppProvider;
