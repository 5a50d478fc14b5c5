pub mod favorite_service;
pub mod payment_service;
pub mod reservation_service;
pub mod spot_service;
