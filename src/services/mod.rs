// Services layer - Business logic and orchestration
pub mod plan_access_service;
pub mod role_service;

pub use plan_access_service::PlanAccessService;
pub use role_service::RoleService;
