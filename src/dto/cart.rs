use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct UpdateCartLineRequest<'a> {
    #[serde(rename = "_id")]
    pub line_id: &'a str,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub struct DeleteCartLineRequest<'a> {
    #[serde(rename = "_id")]
    pub line_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CartCount {
    #[serde(default)]
    pub count: u64,
}
