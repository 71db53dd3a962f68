use utoipa::OpenApi;

use common::types::{AccrualSnapshot, CalculatorData, DemoItem, DemoItemPatch};

use crate::routes::counter::AmountInput;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::counter::get_counter,
        crate::routes::counter::increment,
        crate::routes::counter::decrement,
        crate::routes::items::list,
        crate::routes::items::add,
        crate::routes::items::update,
        crate::routes::items::delete,
        crate::routes::calculator::data,
        crate::routes::calculator::accrual,
    ),
    components(
        schemas(
            AmountInput,
            DemoItem,
            DemoItemPatch,
            CalculatorData,
            AccrualSnapshot,
        )
    ),
    tags(
        (name = "health"),
        (name = "counter"),
        (name = "items"),
        (name = "calculator")
    )
)]
pub struct ApiDoc;
