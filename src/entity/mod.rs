pub mod audit_logs;
pub mod favorites;
pub mod parking_spots;
pub mod payments;
pub mod reservations;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use favorites::Entity as Favorites;
pub use parking_spots::Entity as ParkingSpots;
pub use payments::Entity as Payments;
pub use reservations::Entity as Reservations;
pub use users::Entity as Users;
