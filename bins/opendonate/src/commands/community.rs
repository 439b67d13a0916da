//! Community board commands

use crate::app::App;
use anyhow::Result;
use opendonate_cli::output::print_json;
use opendonate_cli::{render, Status};
use opendonate_community::{CommunityService, NewPost, PostCategory};

pub async fn list(app: &App, board: &CommunityService, category: Option<PostCategory>) -> Result<()> {
    let posts = match category {
        Some(category) => board.posts_by_category(category).await?,
        None => board.all_posts().await?,
    };

    if app.is_json() {
        print_json(&posts)?;
        return Ok(());
    }
    let title = category.map_or("전체 게시판", PostCategory::label);
    Status::header(&format!("{title} ({}개)", posts.len()));
    for post in &posts {
        println!("{}", render::post_line(post));
        println!("    {}", post.id);
    }
    Ok(())
}

/// Show a post and count the view
pub async fn show(app: &App, board: &CommunityService, id: &str) -> Result<()> {
    let post = board.post_by_id(id).await?;
    board.increment_views(id).await;

    if app.is_json() {
        print_json(&post)?;
        return Ok(());
    }
    println!("{}", render::post_detail(&post));
    Ok(())
}

pub async fn write(
    app: &App,
    board: &CommunityService,
    category: PostCategory,
    title: String,
    content: String,
    attachments: Vec<String>,
) -> Result<()> {
    let draft = NewPost {
        attachments,
        ..NewPost::new(category, title, content)
    };
    let id = board.create_post(&draft).await?;

    if app.is_json() {
        print_json(&serde_json::json!({ "id": id }))?;
    } else {
        Status::success(&format!("게시글을 등록했어요 ({id})"));
    }
    Ok(())
}

pub async fn like(app: &App, board: &CommunityService, id: &str) -> Result<()> {
    // Surface a missing post before the counter call, which never fails.
    board.post_by_id(id).await?;
    board.increment_likes(id).await;
    let likes = board.post_by_id(id).await?.likes;

    if app.is_json() {
        print_json(&serde_json::json!({ "id": id, "likes": likes }))?;
    } else {
        Status::success(&format!("좋아요 {likes}"));
    }
    Ok(())
}

pub async fn comment(app: &App, board: &CommunityService, id: &str, content: &str) -> Result<()> {
    let comment = board.add_comment(id, content).await?;

    if app.is_json() {
        print_json(&comment)?;
    } else {
        Status::success("댓글을 등록했어요");
        println!("{}", render::comment_line(&comment));
    }
    Ok(())
}

pub async fn delete(app: &App, board: &CommunityService, id: &str) -> Result<()> {
    board.delete_post(id).await?;

    if app.is_json() {
        print_json(&serde_json::json!({ "id": id, "deleted": true }))?;
    } else {
        Status::success("게시글을 삭제했어요");
    }
    Ok(())
}
