use std::sync::Arc;

use service::{calculator::CalculatorService, object::GlobalObject};

/// Shared router state. Cloned per request; the object itself is a singleton.
#[derive(Clone)]
pub struct AppState {
    pub object: Arc<GlobalObject>,
    pub calculator: Arc<CalculatorService>,
}

impl AppState {
    pub fn new(object: Arc<GlobalObject>, calculator: CalculatorService) -> Self {
        Self { object, calculator: Arc::new(calculator) }
    }
}
