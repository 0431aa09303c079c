use askama::Template;

use super::PageContext;

#[derive(Template)]
#[template(path = "comments/index.html")]
pub struct CommentIndexTemplate {
    pub ctx: PageContext,
}
