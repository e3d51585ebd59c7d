use std::sync::Arc;

/// The single text area the assistant writes status to
pub trait Display: Send + Sync {
    fn show(&self, text: &str);
}

/// Microphone permission
pub trait Permissions: Send + Sync {
    fn is_granted(&self) -> bool;

    /// Ask for the permission; returns whether it was granted
    fn request(&self) -> bool;
}

impl<T: Display + ?Sized> Display for Arc<T> {
    fn show(&self, text: &str) {
        (**self).show(text)
    }
}

impl<T: Permissions + ?Sized> Permissions for Arc<T> {
    fn is_granted(&self) -> bool {
        (**self).is_granted()
    }

    fn request(&self) -> bool {
        (**self).request()
    }
}
