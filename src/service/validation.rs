//! Create/update request bodies, their validation, and the sparse patch built from an update.

use crate::error::AppError;
use crate::model::{NewProduct, StringList, DEFAULT_SELLER_ID};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::borrow::Cow;
use validator::{Validate, ValidateUrl, ValidationError, ValidationErrors};

pub const MAX_HIGHLIGHT_LEN: usize = 40;
/// `price_ton` is stored as NUMERIC(18, 6): at most 12 integer digits and 6 decimals.
pub const PRICE_SCALE: u32 = 6;
pub const PRICE_INTEGER_DIGITS: u32 = 12;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 80, message = "must be between 1 and 80 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 150, message = "must be between 1 and 150 characters"))]
    pub description: String,
    #[serde(default)]
    #[validate(
        length(max = 4, message = "must have at most 4 entries"),
        custom(function = "validate_highlights")
    )]
    pub highlights: Option<Vec<String>>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(required(message = "is required"), custom(function = "validate_price"))]
    pub price_ton: Option<Decimal>,
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub category: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "must have at least one entry"),
        custom(function = "validate_image_urls")
    )]
    pub images: Vec<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub stock: Option<i32>,
}

impl CreateProductRequest {
    /// Validate and convert into insert values. New products are always active.
    pub fn into_new_product(self) -> Result<NewProduct, AppError> {
        self.validate().map_err(validation_error)?;
        let price_ton = self
            .price_ton
            .ok_or_else(|| AppError::Validation("price_ton: is required".into()))?;
        Ok(NewProduct {
            seller_id: DEFAULT_SELLER_ID,
            title: self.title,
            description: self.description,
            highlights: StringList(self.highlights.unwrap_or_default()),
            price_ton,
            category: self.category,
            images: StringList(self.images),
            stock: self.stock.unwrap_or(0),
            is_active: true,
        })
    }
}

/// Every field optional; `null` and a missing key both mean "leave unchanged".
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 80, message = "must be between 1 and 80 characters"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 150, message = "must be between 1 and 150 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(
        length(max = 4, message = "must have at most 4 entries"),
        custom(function = "validate_highlights")
    )]
    pub highlights: Option<Vec<String>>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom(function = "validate_price"))]
    pub price_ton: Option<Decimal>,
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub category: Option<String>,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "must have at least one entry"),
        custom(function = "validate_image_urls")
    )]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub stock: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateProductRequest {
    /// Validate present fields and build the patch. An empty patch is rejected here so it never reaches storage.
    pub fn into_patch(self) -> Result<ProductPatch, AppError> {
        self.validate().map_err(validation_error)?;
        let patch = ProductPatch {
            title: self.title,
            description: self.description,
            highlights: self.highlights.map(StringList),
            price_ton: self.price_ton,
            category: self.category,
            images: self.images.map(StringList),
            stock: self.stock,
            is_active: self.is_active,
        };
        if patch.is_empty() {
            return Err(AppError::BadRequest("nothing to update".into()));
        }
        Ok(patch)
    }
}

/// Columns an update touches. `None` means the column is left as stored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub highlights: Option<StringList>,
    pub price_ton: Option<Decimal>,
    pub category: Option<String>,
    pub images: Option<StringList>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.field_names().is_empty()
    }

    /// Names of the columns present in this patch, in table order.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.title.is_some() {
            names.push("title");
        }
        if self.description.is_some() {
            names.push("description");
        }
        if self.highlights.is_some() {
            names.push("highlights");
        }
        if self.price_ton.is_some() {
            names.push("price_ton");
        }
        if self.category.is_some() {
            names.push("category");
        }
        if self.images.is_some() {
            names.push("images");
        }
        if self.stock.is_some() {
            names.push("stock");
        }
        if self.is_active.is_some() {
            names.push("is_active");
        }
        names
    }
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() || price.is_zero() {
        return Err(invalid("price", "must be greater than 0"));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(invalid("price", "must have at most 6 decimal places"));
    }
    if *price >= Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS)) {
        return Err(invalid("price", "must be less than 1000000000000"));
    }
    Ok(())
}

fn validate_highlights(highlights: &[String]) -> Result<(), ValidationError> {
    if highlights.iter().any(|h| h.chars().count() > MAX_HIGHLIGHT_LEN) {
        return Err(invalid("length", "entries must be at most 40 characters"));
    }
    Ok(())
}

fn validate_image_urls(images: &[String]) -> Result<(), ValidationError> {
    if images.iter().any(|u| !u.validate_url()) {
        return Err(invalid("url", "entries must be valid URLs"));
    }
    Ok(())
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Flatten field errors into one message, e.g. `images: must have at least one entry; title: ...`.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(|e| {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{}: {}", field, msg)
                })
                .collect::<Vec<_>>()
        })
        .collect();
    parts.sort();
    AppError::Validation(parts.join("; "))
}
