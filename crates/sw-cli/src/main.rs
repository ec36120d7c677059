//! Storyweave timeline inspector.
//!
//! Loads a story's timeline (from a running backend, or a built-in demo
//! story held in memory), fits it into a viewport of the given width, and
//! prints the visible grid and the thread map.

mod render;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use sw_core::{Scene, SceneId, Story, StoryId, StoryWithScenes, UpdatePointData, UserId};
use sw_editor::{
    HttpPointApi, MemoryPointApi, PointApi, Timeline, TimelineConfig, TimelineResult,
};

#[derive(Parser)]
#[command(name = "storyweave", version, about = "Inspect branching story timelines")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a story from the backend and print its timeline.
    Show {
        /// Server origin; requests go to `{origin}/api/...`.
        #[arg(long, env = "STORYWEAVE_API_BASE")]
        api_base: String,

        /// Story ID.
        #[arg(long)]
        story: String,

        #[command(flatten)]
        view: ViewArgs,
    },
    /// Build a sample branching story in memory and print its timeline.
    Demo {
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// Container width in pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Width of one step in pixels.
    #[arg(long, default_value_t = 150.0)]
    step_width: f32,

    /// Page to show (1-based).
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Print the views as JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl ViewArgs {
    fn config(&self) -> TimelineConfig {
        TimelineConfig::default().with_step_width(self.step_width)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Show {
            api_base,
            story,
            view,
        } => show(&api_base, StoryId::intern(&story), &view).await,
        Command::Demo { view } => demo(&view).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("storyweave: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn show(api_base: &str, story: StoryId, view: &ViewArgs) -> TimelineResult<()> {
    let api = HttpPointApi::for_server(api_base);
    log::info!("loading story {story} from {}", api.base());
    let story = api.get_story(story).await?;

    let mut timeline = Timeline::with_config(api, story, view.config());
    timeline.init().await?;
    present(&mut timeline, view);
    Ok(())
}

async fn demo(view: &ViewArgs) -> TimelineResult<()> {
    let mut timeline = Timeline::with_config(MemoryPointApi::default(), demo_story(), view.config());
    timeline.init().await?;

    // root ─┬─ hall ── cellar ─┐
    //       └─ garden ─────────┴─ (merge) ending
    let Some(root) = timeline.points().first().map(|p| p.id) else {
        return Ok(());
    };
    timeline
        .update_point(root, UpdatePointData::scene(Some(SceneId::intern("demo-gate"))))
        .await?;
    timeline.add_point_action(root).await?;
    timeline.add_point_action(root).await?;
    let hall = timeline.create_point_and_attach_to_action(root, 0).await?;
    let garden = timeline.create_point_and_attach_to_action(root, 1).await?;

    timeline.add_point_action(hall.id).await?;
    let cellar = timeline.create_point_and_attach_to_action(hall.id, 0).await?;

    timeline.add_point_action(cellar.id).await?;
    let ending = timeline.create_point_and_attach_to_action(cellar.id, 0).await?;

    timeline.add_point_action(garden.id).await?;
    if let Some(mut actions) = timeline.point(garden.id).map(|p| p.actions.clone())
        && let Some(first) = actions.first_mut()
    {
        first.to_point_id = Some(ending.id);
        timeline
            .update_point(garden.id, UpdatePointData::actions(actions))
            .await?;
    }
    timeline.set_point_expanded(root, true);

    present(&mut timeline, view);
    Ok(())
}

fn demo_story() -> StoryWithScenes {
    let user = UserId::intern("demo-user");
    let story = StoryId::intern("demo-story");
    let scene = |id: &str, name: &str| Scene {
        id: SceneId::intern(id),
        user_id: user,
        story_id: story,
        name: name.to_string(),
        description: String::new(),
        image: String::new(),
        created_at: Utc::now(),
    };
    StoryWithScenes {
        story: Story {
            id: story,
            user_id: user,
            name: "The Old House".to_string(),
            description: "A short branching demo".to_string(),
            created_at: Utc::now(),
        },
        scenes: vec![scene("demo-gate", "Gate")],
    }
}

fn present<A: PointApi>(timeline: &mut Timeline<A>, view: &ViewArgs) {
    timeline.resize(view.width);
    timeline.set_page(view.page);

    let grid = timeline.points_grid();
    let visible = timeline.visible_item_indexes();
    let (page, pages) = (timeline.page(), timeline.pages());
    let lines = timeline.point_lines_map();

    if view.json {
        let doc = serde_json::json!({
            "page": page,
            "pages": pages,
            "visibleItemIndexes": visible,
            "pointsGrid": grid,
            "pointLinesMap": lines,
        });
        println!("{doc:#}");
        return;
    }

    print!(
        "{}",
        render::render(&render::View {
            grid: &grid,
            visible: &visible,
            page,
            pages,
            lines,
        })
    );
}
