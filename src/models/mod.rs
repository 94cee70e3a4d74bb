mod notification;

pub use notification::NotificationRequest;
