#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate of the club workspace.
//!
//! * [`macro@club_error`] turns an enum into a `thiserror` error with context support.
//! * [`macro@club_slice`] turns a struct into a registrable feature slice handle.
//! * [`macro@api_model`] / [`macro@api_handler`] wire DTOs and axum handlers into `OpenAPI`.
//!
//! The examples are `ignore`d because they need the consuming crates in scope.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Defines a standard API data model (DTO).
///
/// # Injected Behaviors
///
/// * **Derives**: `Debug`, `Serialize`, `Deserialize` and `utoipa::ToSchema` when missing.
/// * **Serde Policy**:
///     * `rename_all = "snake_case"` by default (can be overridden).
///     * `deny_unknown_fields` by default (can be disabled).
///
/// # Example
///
/// ```rust,ignore
/// use club_derive::api_model;
///
/// #[api_model(rename_all = "camelCase", deny_unknown_fields = false)]
/// pub struct MemberView {
///     pub id: i64,
///     pub joined_date: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Bridges an axum handler with its `OpenAPI` description.
///
/// Accepts the regular `utoipa::path` arguments (`get`, `post`, `path = "..."`,
/// `responses(...)`, `tag = "..."`) and allows `clippy::unused_async` on the handler.
///
/// # Example
///
/// ```rust,ignore
/// #[api_handler(
///     get,
///     path = "/health",
///     responses((status = OK, body = HealthResponse)),
///     tag = "System"
/// )]
/// pub async fn health_handler() -> impl IntoResponse {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Turns an enum into a crate error type.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` when not already derived.
/// * A `<Name>Ext` trait with `.context(...)` for `Result<T, Name>` and for
///   `Result<T, Source>` of every variant wrapping a `source`.
/// * `From<Source>` for every variant with a `source` field (except `Internal`).
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }`
///   variant exists.
/// * A module-private `format_context` helper for the `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must use named fields. A variant with a `source` (or a field marked
/// `#[source]`/`#[from]`) must also carry `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[club_derive::club_error]
/// pub enum MemberError {
///     #[error("Member not found{}: {message}", format_context(.context))]
///     NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Database error{}: {source}", format_context(.context))]
///     Database { source: club_database::DatabaseError, context: Option<Cow<'static, str>> },
///
///     #[error("Internal members error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn club_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}

/// Defines a vertical slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` is generated as a cheap
/// `Arc` wrapper that derefs to the inner state and implements `FeatureSlice`.
///
/// # Example
/// ```rust,ignore
/// #[club_derive::club_slice]
/// pub struct Members {
///     repository: MemberRepository,
/// }
///
/// let slice = Members::new(MembersInner { repository });
/// ```
#[proc_macro_attribute]
pub fn club_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
