#![deny(clippy::all, clippy::pedantic)]

use serde_json::json;
use vitrina::domain::storefront::stock_notify_request;

use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, product: &str, email: &str, phone: &str) -> Result<(), CliError> {
    let request = stock_notify_request(product, email, phone)?;
    ctx.notifier()?.notify(&request).await?;
    print_json(&json!({ "sent": true, "product": request.product_name }))
}
