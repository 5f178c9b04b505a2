use crate::modules::sync::core::resource::WatchedResource;

/// The collections the point-of-sale screens refresh from.
pub fn retail_resources() -> Vec<WatchedResource> {
    vec![
        WatchedResource::new("products"),
        WatchedResource::new("clients"),
        WatchedResource::new("suppliers"),
        WatchedResource::new("sales"),
        WatchedResource::new("cash_registers").with_timestamp_field("opened_at"),
        WatchedResource::new("cash_movements").with_timestamp_field("created_at"),
        WatchedResource::new("return_vouchers"),
        WatchedResource::new("delivery_receipts"),
    ]
}

pub fn retail_resource_names() -> Vec<String> {
    retail_resources().into_iter().map(|r| r.name).collect()
}
