//! Server-rendered member pages.

use crate::Members;
use crate::error::{MemberError, MemberErrorExt};
use crate::model::{Member, MemberForm};
use axum::Form;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use club_kernel::prelude::{ApiState, FieldErrors, parse_id};
use tera::{Context, Tera};
use tracing::error;

const TEMPLATES: [(&str, &str); 5] = [
    ("base.html", include_str!("../templates/base.html")),
    ("list.html", include_str!("../templates/list.html")),
    ("detail.html", include_str!("../templates/detail.html")),
    ("form.html", include_str!("../templates/form.html")),
    ("confirm_delete.html", include_str!("../templates/confirm_delete.html")),
];

/// The member page templates, parsed once at startup.
#[derive(Debug, Clone)]
pub struct Pages {
    tera: Tera,
}

impl Pages {
    /// # Errors
    /// [`MemberError::Template`] when a template does not parse.
    pub fn load() -> Result<Self, MemberError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES).context("Parsing member templates")?;
        Ok(Self { tera })
    }

    fn render(&self, name: &str, context: &Context) -> Result<Html<String>, MemberError> {
        self.tera.render(name, context).map(Html).context(format!("Rendering {name}"))
    }

    fn form(
        &self,
        action: &str,
        form: &MemberForm,
        errors: &FieldErrors,
        member: Option<&Member>,
    ) -> Result<Html<String>, MemberError> {
        let mut context = Context::new();
        context.insert("action", action);
        context.insert("form", form);
        context.insert("errors", errors);
        context.insert("member", &member);
        self.render("form.html", &context)
    }

    fn member(&self, name: &str, member: &Member) -> Result<Html<String>, MemberError> {
        let mut context = Context::new();
        context.insert("member", member);
        self.render(name, &context)
    }
}

/// Failure of a page handler, answered with an HTML error page.
#[derive(Debug)]
pub struct PageError(MemberError);

impl From<MemberError> for PageError {
    fn from(error: MemberError) -> Self {
        Self(error)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self.0 {
            MemberError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, Html(include_str!("../templates/404.html"))).into_response()
            },
            other => {
                error!(error = %other, "Member page failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(include_str!("../templates/500.html"))).into_response()
            },
        }
    }
}

type PageResult = Result<Response, PageError>;

fn slice(state: &ApiState) -> Result<&Members, MemberError> {
    state.try_get_slice::<Members>().map_err(|e| MemberError::from(e.to_string()))
}

fn member_id(raw: &str) -> Result<i64, MemberError> {
    parse_id(raw).ok_or(MemberError::NotFound { id: 0 })
}

fn detail_url(id: i64) -> String {
    format!("/members/{id}/")
}

pub async fn list_page(State(state): State<ApiState>) -> PageResult {
    let slice = slice(&state)?;
    let members = slice.repository.list().await?;

    let mut context = Context::new();
    context.insert("members", &members);
    Ok(slice.pages.render("list.html", &context)?.into_response())
}

pub async fn detail_page(State(state): State<ApiState>, Path(id): Path<String>) -> PageResult {
    let slice = slice(&state)?;
    let member = slice.repository.get(member_id(&id)?).await?;
    Ok(slice.pages.member("detail.html", &member)?.into_response())
}

pub async fn new_page(State(state): State<ApiState>) -> PageResult {
    let pages = &slice(&state)?.pages;
    Ok(pages.form("Create", &MemberForm::default(), &FieldErrors::new(), None)?.into_response())
}

pub async fn create_page(State(state): State<ApiState>, Form(form): Form<MemberForm>) -> PageResult {
    let slice = slice(&state)?;
    match slice.repository.create(form.clone().into_draft(None)).await {
        Ok(member) => Ok(Redirect::to(&detail_url(member.id)).into_response()),
        Err(MemberError::Invalid { errors }) => {
            Ok(slice.pages.form("Create", &form, &errors, None)?.into_response())
        },
        Err(other) => Err(other.into()),
    }
}

pub async fn edit_page(State(state): State<ApiState>, Path(id): Path<String>) -> PageResult {
    let slice = slice(&state)?;
    let member = slice.repository.get(member_id(&id)?).await?;
    let form = MemberForm::from(&member);
    Ok(slice.pages.form("Update", &form, &FieldErrors::new(), Some(&member))?.into_response())
}

pub async fn update_page(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Form(form): Form<MemberForm>,
) -> PageResult {
    let slice = slice(&state)?;
    let member = slice.repository.get(member_id(&id)?).await?;
    match slice.repository.update(member.id, form.clone().into_draft(member.team)).await {
        Ok(updated) => Ok(Redirect::to(&detail_url(updated.id)).into_response()),
        Err(MemberError::Invalid { errors }) => {
            Ok(slice.pages.form("Update", &form, &errors, Some(&member))?.into_response())
        },
        Err(other) => Err(other.into()),
    }
}

pub async fn delete_page(State(state): State<ApiState>, Path(id): Path<String>) -> PageResult {
    let slice = slice(&state)?;
    let member = slice.repository.get(member_id(&id)?).await?;
    Ok(slice.pages.member("confirm_delete.html", &member)?.into_response())
}

pub async fn destroy_page(State(state): State<ApiState>, Path(id): Path<String>) -> PageResult {
    let slice = slice(&state)?;
    slice.repository.delete(member_id(&id)?).await?;
    Ok(Redirect::to("/members/").into_response())
}
