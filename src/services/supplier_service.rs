use crate::{
    database::{MongoDB, SUPPLIERS_COLLECTION},
    models::{CreateSupplierRequest, Supplier, SupplierResponse, UpdateSupplierRequest},
    utils::error::AppError,
};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

const CSV_HEADER: &str = "Vendor Name,Company Name,Mobile Number,Email,GSTIN Number,PAN Number,Status";

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPage {
    pub suppliers: Vec<SupplierResponse>,
    pub total: u64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

/// Paginated, filtered listing. The filter is a case-insensitive substring
/// match on companyName; no sort order is imposed, so insertion order is
/// the de facto order and page boundaries may drift under concurrent writes.
pub async fn list(
    db: &MongoDB,
    search: Option<&str>,
    page: Option<i64>,
    limit: Option<i64>,
) -> Result<SupplierPage, AppError> {
    let page = page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let skip = (page - 1) * limit;

    let filter = match search {
        Some(term) if !term.is_empty() => doc! {
            "companyName": { "$regex": escape_regex(term), "$options": "i" }
        },
        _ => doc! {},
    };

    let collection = db.collection::<Supplier>(SUPPLIERS_COLLECTION);

    let total = collection
        .count_documents(filter.clone())
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to count suppliers: {}", e)))?;

    let mut cursor = collection
        .find(filter)
        .skip(skip as u64)
        .limit(limit)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch suppliers: {}", e)))?;

    let mut suppliers = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(supplier) => suppliers.push(SupplierResponse::from(supplier)),
            Err(e) => {
                log::error!("❌ Skipping unreadable supplier document: {}", e);
            }
        }
    }

    Ok(SupplierPage {
        suppliers,
        total,
        page,
        limit,
        total_pages: total_pages(total, limit),
    })
}

pub async fn get(db: &MongoDB, id: &str) -> Result<SupplierResponse, AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<Supplier>(SUPPLIERS_COLLECTION);

    collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch supplier: {}", e)))?
        .map(SupplierResponse::from)
        .ok_or_else(|| AppError::NotFound("Supplier not found".to_string()))
}

/// Validates the three required fields, stamps timestamps and inserts.
/// Returns the hex id of the new document.
pub async fn insert(db: &MongoDB, request: &CreateSupplierRequest) -> Result<String, AppError> {
    validate_create(request)?;

    let now = chrono::Utc::now().timestamp();
    let supplier = build_document(request, now);

    let collection = db.collection::<Supplier>(SUPPLIERS_COLLECTION);
    let result = collection
        .insert_one(&supplier)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to insert supplier: {}", e)))?;

    result
        .inserted_id
        .as_object_id()
        .map(|id| id.to_hex())
        .ok_or_else(|| AppError::DatabaseError("Insert returned no ObjectId".to_string()))
}

/// Shallow-merges the provided fields over the stored document. Required
/// fields are not re-validated after the merge; an update can blank them.
pub async fn update(
    db: &MongoDB,
    id: &str,
    request: &UpdateSupplierRequest,
) -> Result<(), AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<Supplier>(SUPPLIERS_COLLECTION);

    let existing = collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch supplier: {}", e)))?;

    if existing.is_none() {
        return Err(AppError::NotFound("Supplier not found".to_string()));
    }

    let update_doc = build_update_document(request, chrono::Utc::now().timestamp())?;

    collection
        .update_one(doc! { "_id": object_id }, doc! { "$set": update_doc })
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update supplier: {}", e)))?;

    Ok(())
}

pub async fn delete(db: &MongoDB, id: &str) -> Result<(), AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<Supplier>(SUPPLIERS_COLLECTION);

    let result = collection
        .delete_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to delete supplier: {}", e)))?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Supplier not found".to_string()));
    }

    Ok(())
}

/// Serializes every supplier (no pagination) into the 7-column CSV.
pub async fn export_all(db: &MongoDB) -> Result<String, AppError> {
    let collection = db.collection::<Supplier>(SUPPLIERS_COLLECTION);

    let mut cursor = collection
        .find(doc! {})
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch suppliers: {}", e)))?;

    let mut suppliers = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(supplier) => suppliers.push(supplier),
            Err(e) => {
                log::error!("❌ Skipping unreadable supplier document: {}", e);
            }
        }
    }

    Ok(export_csv(&suppliers))
}

fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::InvalidRequest("Invalid supplier ID".to_string()))
}

/// companyName, vendorName and primaryEmail are required; empty strings
/// count as missing, matching the add form behavior.
fn validate_create(request: &CreateSupplierRequest) -> Result<(), AppError> {
    let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());

    if !present(&request.company_name)
        || !present(&request.vendor_name)
        || !present(&request.primary_email)
    {
        return Err(AppError::InvalidRequest("Missing required fields".to_string()));
    }

    Ok(())
}

/// Maps the form-facing request onto the stored document layout
/// (primaryPhone -> mobileNumber, primaryEmail -> email, pan -> panNumber,
/// gstNumber -> gstinNumber).
fn build_document(request: &CreateSupplierRequest, now: i64) -> Supplier {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();

    Supplier {
        id: None,
        company_name: field(&request.company_name),
        vendor_name: field(&request.vendor_name),
        mobile_number: field(&request.primary_phone),
        email: field(&request.primary_email),
        secondary_email: field(&request.secondary_email),
        secondary_phone: field(&request.secondary_phone),
        pan_number: field(&request.pan),
        gstin_number: field(&request.gst_number),
        supplier_type: field(&request.supplier_type),
        category: field(&request.category),
        website: field(&request.website),
        address_line1: field(&request.address_line1),
        address_line2: field(&request.address_line2),
        district: field(&request.district),
        city: field(&request.city),
        state: field(&request.state),
        pincode: field(&request.pincode),
        country: field(&request.country),
        account_name: field(&request.account_name),
        account_number: field(&request.account_number),
        bank_branch_name: field(&request.bank_branch_name),
        ifsc_code: field(&request.ifsc_code),
        status: request.status.unwrap_or_default(),
        notes: field(&request.notes),
        attachments: request.attachments.clone().unwrap_or_default(),
        created_at: now,
        updated_at: now,
    }
}

/// Builds the `$set` document: exactly the provided fields plus updatedAt.
fn build_update_document(
    request: &UpdateSupplierRequest,
    now: i64,
) -> Result<Document, AppError> {
    let mut update_doc = doc! { "updatedAt": now };

    if let Some(company_name) = &request.company_name {
        update_doc.insert("companyName", company_name.as_str());
    }
    if let Some(vendor_name) = &request.vendor_name {
        update_doc.insert("vendorName", vendor_name.as_str());
    }
    if let Some(mobile_number) = &request.mobile_number {
        update_doc.insert("mobileNumber", mobile_number.as_str());
    }
    if let Some(email) = &request.email {
        update_doc.insert("email", email.as_str());
    }
    if let Some(secondary_email) = &request.secondary_email {
        update_doc.insert("secondaryEmail", secondary_email.as_str());
    }
    if let Some(secondary_phone) = &request.secondary_phone {
        update_doc.insert("secondaryPhone", secondary_phone.as_str());
    }
    if let Some(pan_number) = &request.pan_number {
        update_doc.insert("panNumber", pan_number.as_str());
    }
    if let Some(gstin_number) = &request.gstin_number {
        update_doc.insert("gstinNumber", gstin_number.as_str());
    }
    if let Some(supplier_type) = &request.supplier_type {
        update_doc.insert("supplierType", supplier_type.as_str());
    }
    if let Some(category) = &request.category {
        update_doc.insert("category", category.as_str());
    }
    if let Some(website) = &request.website {
        update_doc.insert("website", website.as_str());
    }
    if let Some(address_line1) = &request.address_line1 {
        update_doc.insert("addressLine1", address_line1.as_str());
    }
    if let Some(address_line2) = &request.address_line2 {
        update_doc.insert("addressLine2", address_line2.as_str());
    }
    if let Some(district) = &request.district {
        update_doc.insert("district", district.as_str());
    }
    if let Some(city) = &request.city {
        update_doc.insert("city", city.as_str());
    }
    if let Some(state) = &request.state {
        update_doc.insert("state", state.as_str());
    }
    if let Some(pincode) = &request.pincode {
        update_doc.insert("pincode", pincode.as_str());
    }
    if let Some(country) = &request.country {
        update_doc.insert("country", country.as_str());
    }
    if let Some(account_name) = &request.account_name {
        update_doc.insert("accountName", account_name.as_str());
    }
    if let Some(account_number) = &request.account_number {
        update_doc.insert("accountNumber", account_number.as_str());
    }
    if let Some(bank_branch_name) = &request.bank_branch_name {
        update_doc.insert("bankBranchName", bank_branch_name.as_str());
    }
    if let Some(ifsc_code) = &request.ifsc_code {
        update_doc.insert("ifscCode", ifsc_code.as_str());
    }
    if let Some(status) = &request.status {
        let value = mongodb::bson::to_bson(status)
            .map_err(|e| AppError::DatabaseError(format!("Failed to encode status: {}", e)))?;
        update_doc.insert("status", value);
    }
    if let Some(notes) = &request.notes {
        update_doc.insert("notes", notes.as_str());
    }
    if let Some(attachments) = &request.attachments {
        let value = mongodb::bson::to_bson(attachments)
            .map_err(|e| AppError::DatabaseError(format!("Failed to encode attachments: {}", e)))?;
        update_doc.insert("attachments", value);
    }

    Ok(update_doc)
}

fn total_pages(total: u64, limit: i64) -> i64 {
    (total as i64 + limit - 1) / limit
}

/// Escapes regex metacharacters so the search filter behaves as a literal
/// substring match.
fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(
            ch,
            '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\'
        ) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// 7-column CSV: unquoted header row, every data field double-quoted with
/// embedded quotes doubled.
pub fn export_csv(suppliers: &[Supplier]) -> String {
    use std::fmt::Write;

    let mut csv = String::new();
    let _ = writeln!(csv, "{}", CSV_HEADER);

    for supplier in suppliers {
        let row = [
            supplier.vendor_name.clone(),
            supplier.company_name.clone(),
            supplier.mobile_number.clone(),
            supplier.email.clone(),
            supplier.gstin_number.clone(),
            supplier.pan_number.clone(),
            supplier.status.to_string(),
        ];

        let line = row
            .iter()
            .map(|field| csv_quote(field))
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(csv, "{}", line);
    }

    csv
}

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attachment, SupplierStatus};

    fn sample_supplier() -> Supplier {
        build_document(
            &CreateSupplierRequest {
                company_name: Some("Acme Traders".to_string()),
                vendor_name: Some("Acme".to_string()),
                primary_email: Some("sales@acme.test".to_string()),
                primary_phone: Some("9876543210".to_string()),
                pan: Some("ABCDE1234F".to_string()),
                gst_number: Some("22ABCDE1234F1Z5".to_string()),
                ..Default::default()
            },
            1_700_000_000,
        )
    }

    #[test]
    fn test_csv_of_zero_suppliers_is_header_only() {
        assert_eq!(
            export_csv(&[]),
            "Vendor Name,Company Name,Mobile Number,Email,GSTIN Number,PAN Number,Status\n"
        );
    }

    #[test]
    fn test_csv_quotes_every_field() {
        let supplier = sample_supplier();
        let csv = export_csv(std::slice::from_ref(&supplier));
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "\"Acme\",\"Acme Traders\",\"9876543210\",\"sales@acme.test\",\"22ABCDE1234F1Z5\",\"ABCDE1234F\",\"Active\""
        );
    }

    #[test]
    fn test_csv_doubles_embedded_quotes() {
        let mut supplier = sample_supplier();
        supplier.company_name = "Acme \"The Best\", Ltd".to_string();
        let csv = export_csv(std::slice::from_ref(&supplier));
        assert!(csv.contains("\"Acme \"\"The Best\"\", Ltd\""));
    }

    #[test]
    fn test_validate_requires_primary_email() {
        let request = CreateSupplierRequest {
            company_name: Some("Acme Traders".to_string()),
            vendor_name: Some("Acme".to_string()),
            primary_email: None,
            ..Default::default()
        };

        let err = validate_create(&request).unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields");
    }

    #[test]
    fn test_validate_treats_empty_string_as_missing() {
        let request = CreateSupplierRequest {
            company_name: Some(String::new()),
            vendor_name: Some("Acme".to_string()),
            primary_email: Some("sales@acme.test".to_string()),
            ..Default::default()
        };

        assert!(validate_create(&request).is_err());
    }

    #[test]
    fn test_build_document_maps_form_names() {
        let supplier = sample_supplier();
        assert_eq!(supplier.mobile_number, "9876543210");
        assert_eq!(supplier.email, "sales@acme.test");
        assert_eq!(supplier.pan_number, "ABCDE1234F");
        assert_eq!(supplier.gstin_number, "22ABCDE1234F1Z5");
        assert_eq!(supplier.status, SupplierStatus::Active);
        assert_eq!(supplier.created_at, supplier.updated_at);
    }

    #[test]
    fn test_build_update_document_sets_only_provided_fields() {
        let request = UpdateSupplierRequest {
            company_name: Some("New Name".to_string()),
            status: Some(SupplierStatus::Inactive),
            attachments: Some(vec![Attachment {
                name: "contract.pdf".to_string(),
                url: "/uploads/abc-contract.pdf".to_string(),
            }]),
            ..Default::default()
        };

        let update_doc = build_update_document(&request, 1_700_000_123).unwrap();

        let mut keys: Vec<_> = update_doc.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["attachments", "companyName", "status", "updatedAt"]);
        assert_eq!(update_doc.get_str("companyName").unwrap(), "New Name");
        assert_eq!(update_doc.get_str("status").unwrap(), "Inactive");
        assert_eq!(update_doc.get_i64("updatedAt").unwrap(), 1_700_000_123);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }

    #[test]
    fn test_escape_regex_neutralizes_metacharacters() {
        assert_eq!(escape_regex("a.b*c"), "a\\.b\\*c");
        assert_eq!(escape_regex("(acme)"), "\\(acme\\)");
        assert_eq!(escape_regex("plain"), "plain");
    }
}
