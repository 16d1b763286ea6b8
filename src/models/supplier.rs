use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named reference to an uploaded file, owned by value inside the
/// supplier document. Deleting the supplier does not delete the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, utoipa::ToSchema)]
pub enum SupplierStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for SupplierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplierStatus::Active => write!(f, "Active"),
            SupplierStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

/// Supplier record (stored in MongoDB, camelCase field names)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub company_name: String,
    pub vendor_name: String,

    /// Primary phone (stored as mobileNumber)
    #[serde(default)]
    pub mobile_number: String,
    /// Primary email (stored as email)
    pub email: String,
    #[serde(default)]
    pub secondary_email: String,
    #[serde(default)]
    pub secondary_phone: String,

    #[serde(default)]
    pub pan_number: String,
    #[serde(default)]
    pub gstin_number: String,
    #[serde(default)]
    pub supplier_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub website: String,

    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub country: String,

    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub bank_branch_name: String,
    #[serde(default)]
    pub ifsc_code: String,

    #[serde(default)]
    pub status: SupplierStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,

    /// Unix timestamps, stamped server-side
    pub created_at: i64,
    pub updated_at: i64,
}

/// Request to create a supplier. Field names follow the add form
/// (primaryPhone/primaryEmail/pan/gstNumber), which map onto the stored
/// names at insert time. Everything is optional at the serde level so
/// missing required fields surface as a 400 with a message rather than a
/// deserialization error.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierRequest {
    pub company_name: Option<String>,
    pub vendor_name: Option<String>,
    pub primary_phone: Option<String>,
    pub primary_email: Option<String>,
    pub secondary_email: Option<String>,
    pub secondary_phone: Option<String>,
    pub pan: Option<String>,
    pub gst_number: Option<String>,
    pub supplier_type: Option<String>,
    pub category: Option<String>,
    pub website: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub bank_branch_name: Option<String>,
    pub ifsc_code: Option<String>,
    pub status: Option<SupplierStatus>,
    pub notes: Option<String>,
    pub attachments: Option<Vec<Attachment>>,
}

/// Partial update. Field names match the stored document; only the fields
/// present in the request are written, shallow-merged over the document.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupplierRequest {
    pub company_name: Option<String>,
    pub vendor_name: Option<String>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub secondary_email: Option<String>,
    pub secondary_phone: Option<String>,
    pub pan_number: Option<String>,
    pub gstin_number: Option<String>,
    pub supplier_type: Option<String>,
    pub category: Option<String>,
    pub website: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub bank_branch_name: Option<String>,
    pub ifsc_code: Option<String>,
    pub status: Option<SupplierStatus>,
    pub notes: Option<String>,
    pub attachments: Option<Vec<Attachment>>,
}

/// Supplier as returned by the API (hex id instead of ObjectId)
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierResponse {
    pub id: String,
    pub company_name: String,
    pub vendor_name: String,
    pub mobile_number: String,
    pub email: String,
    pub secondary_email: String,
    pub secondary_phone: String,
    pub pan_number: String,
    pub gstin_number: String,
    pub supplier_type: String,
    pub category: String,
    pub website: String,
    pub address_line1: String,
    pub address_line2: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub account_name: String,
    pub account_number: String,
    pub bank_branch_name: String,
    pub ifsc_code: String,
    pub status: SupplierStatus,
    pub notes: String,
    pub attachments: Vec<Attachment>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Supplier> for SupplierResponse {
    fn from(supplier: Supplier) -> Self {
        SupplierResponse {
            id: supplier.id.map(|id| id.to_hex()).unwrap_or_default(),
            company_name: supplier.company_name,
            vendor_name: supplier.vendor_name,
            mobile_number: supplier.mobile_number,
            email: supplier.email,
            secondary_email: supplier.secondary_email,
            secondary_phone: supplier.secondary_phone,
            pan_number: supplier.pan_number,
            gstin_number: supplier.gstin_number,
            supplier_type: supplier.supplier_type,
            category: supplier.category,
            website: supplier.website,
            address_line1: supplier.address_line1,
            address_line2: supplier.address_line2,
            district: supplier.district,
            city: supplier.city,
            state: supplier.state,
            pincode: supplier.pincode,
            country: supplier.country,
            account_name: supplier.account_name,
            account_number: supplier.account_number,
            bank_branch_name: supplier.bank_branch_name,
            ifsc_code: supplier.ifsc_code,
            status: supplier.status,
            notes: supplier.notes,
            attachments: supplier.attachments,
            created_at: supplier.created_at,
            updated_at: supplier.updated_at,
        }
    }
}
