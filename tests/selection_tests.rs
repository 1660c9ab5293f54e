use std::path::{Path, PathBuf};
use std::sync::Arc;

use cutsel_cli::adapters::{
    MockEditorAdapter, MockFsAdapter, MockTransportAdapter, RecordingPlayerAdapter,
    ScriptedPromptAdapter,
};
use cutsel_cli::app::{BatchInteractor, BatchSettings, SelectionInteractor, SelectionSettings};
use cutsel_cli::cache::{CacheSettings, ContentCache};
use cutsel_cli::domain::model::{Cut, SkipReason};
use cutsel_cli::ports::{EditorPort, FsPort, PlayerPort, PromptPort, TransportPort};
use cutsel_cli::sources::{
    CutlistSource, FileSystemSource, LocalAuthoredSource, NetworkSource, SourceSet,
};
use cutsel_cli::*;

const BASE: &str = "http://cutlists.test/";
const VIDEO: &str = "/videos/show.avi";

const LISTING: &str = "<files count=\"2\">\
    <cutlist row_index=\"0\"><id>1</id><rating>2.0</rating><ratingbyauthor>3</ratingbyauthor></cutlist>\
    <cutlist row_index=\"1\"><id>2</id><rating>4.5</rating><ratingbyauthor>4</ratingbyauthor></cutlist>\
    </files>";

const CUTLIST: &str = "[General]\r\n\
    Application=SomeTool\r\n\
    ApplyToFile=show.avi\r\n\
    OriginalFileSizeBytes=1000\r\n\
    FramesPerSecond=25\r\n\
    \r\n\
    [Cut0]\r\n\
    Start=60.000000\r\n\
    Duration=30.000000\r\n";

fn search_url() -> String {
    format!("{}getxml.php?name=show.avi&version=0.9.8.0", BASE)
}

fn content_url(id: &str) -> String {
    format!("{}getfile.php?id={}", BASE, id)
}

/// Every port of a test run, kept for assertions
struct Harness {
    transport: Arc<MockTransportAdapter>,
    prompt: Arc<ScriptedPromptAdapter>,
    editor: Arc<MockEditorAdapter>,
    player: Arc<RecordingPlayerAdapter>,
    fs: Arc<MockFsAdapter>,
    authored: Arc<ContentCache>,
}

impl Harness {
    fn new(transport: MockTransportAdapter, input: &[&str]) -> Self {
        Self::with_fs(transport, input, MockFsAdapter::new().with_file(VIDEO, "video"))
    }

    fn with_fs(transport: MockTransportAdapter, input: &[&str], fs: MockFsAdapter) -> Self {
        let model = TimingModel::new(25.0, vec![Cut::new(250, 500)], "show.avi".to_string(), 1000)
            .unwrap();
        Self {
            transport: Arc::new(transport),
            prompt: Arc::new(ScriptedPromptAdapter::new(input.iter().copied())),
            editor: Arc::new(MockEditorAdapter::new(Some(model))),
            player: Arc::new(RecordingPlayerAdapter::new()),
            fs: Arc::new(fs),
            authored: Arc::new(ContentCache::open(CacheSettings::new("mycutlist")).unwrap()),
        }
    }

    fn sources(&self) -> Arc<SourceSet> {
        let prompt = Arc::clone(&self.prompt) as Arc<dyn PromptPort>;
        Arc::new(SourceSet::new(vec![
            CutlistSource::Network(NetworkSource::new(
                Arc::clone(&self.transport) as Arc<dyn TransportPort>,
                Arc::clone(&prompt),
                Arc::new(ContentCache::open(CacheSettings::new("search")).unwrap()),
                Arc::new(ContentCache::open(CacheSettings::new("cutlist")).unwrap()),
                BASE,
                true,
            )),
            CutlistSource::LocalAuthored(LocalAuthoredSource::new(
                Arc::clone(&self.authored),
                Arc::clone(&self.editor) as Arc<dyn EditorPort>,
                Arc::clone(&prompt),
                "tester",
            )),
            CutlistSource::FileSystem(FileSystemSource::new(
                Arc::clone(&self.fs) as Arc<dyn FsPort>
            )),
        ]))
    }

    fn settings() -> SelectionSettings {
        SelectionSettings {
            priority: vec![SourceKind::Network, SourceKind::LocalAuthored],
            planner: PreviewPlanner::new(10.0, 5.0),
            cut_name: "{base}-cut{rating}.{ext}".to_string(),
        }
    }

    fn selection_with(&self, sources: Arc<SourceSet>) -> SelectionInteractor {
        SelectionInteractor::new(
            sources,
            Arc::clone(&self.prompt) as Arc<dyn PromptPort>,
            Arc::clone(&self.fs) as Arc<dyn FsPort>,
            Arc::clone(&self.player) as Arc<dyn PlayerPort>,
            Self::settings(),
        )
    }

    fn selection(&self) -> SelectionInteractor {
        self.selection_with(self.sources())
    }

    fn batch(&self, check: bool) -> BatchInteractor {
        let sources = self.sources();
        BatchInteractor::new(
            Arc::new(self.selection_with(Arc::clone(&sources))),
            sources,
            Arc::clone(&self.prompt) as Arc<dyn PromptPort>,
            Arc::clone(&self.fs) as Arc<dyn FsPort>,
            Arc::clone(&self.player) as Arc<dyn PlayerPort>,
            BatchSettings {
                cut_dir: PathBuf::from("/cut"),
                check,
            },
        )
    }
}

fn network_with_listing() -> MockTransportAdapter {
    MockTransportAdapter::new()
        .with_response(search_url(), LISTING)
        .with_response(content_url("2"), CUTLIST)
        .with_response(content_url("1"), CUTLIST)
}

#[tokio::test]
async fn test_choose_best_ranked_candidate() {
    let harness = Harness::new(network_with_listing(), &["1"]);
    let outcome = harness.selection().choose(Path::new(VIDEO)).await.unwrap();

    let SelectionOutcome::Chosen(chosen) = outcome else {
        panic!("expected a chosen cut list, got {:?}", outcome);
    };
    assert_eq!(chosen.record.id(), "2");
    assert_eq!(chosen.timing.cuts, vec![Cut::new(1500, 750)]);
    assert_eq!(chosen.output_name, "show-cut450.avi");
    assert_eq!(
        harness.transport.requests(),
        vec![search_url(), content_url("2")]
    );
}

#[tokio::test]
async fn test_empty_line_skips_file() {
    let harness = Harness::new(network_with_listing(), &[""]);
    let outcome = harness.selection().choose(Path::new(VIDEO)).await.unwrap();
    assert!(matches!(outcome, SelectionOutcome::Skipped(SkipReason::UserSkipped)));
}

#[tokio::test]
async fn test_end_of_input() {
    let harness = Harness::new(network_with_listing(), &[]);
    let outcome = harness.selection().choose(Path::new(VIDEO)).await.unwrap();
    assert!(matches!(outcome, SelectionOutcome::Skipped(SkipReason::InputClosed)));
}

#[tokio::test]
async fn test_no_source_offers_candidates() {
    let transport = MockTransportAdapter::new().with_failure(search_url());
    let harness = Harness::new(transport, &["1"]);

    let outcome = harness.selection().choose(Path::new(VIDEO)).await.unwrap();
    assert!(matches!(outcome, SelectionOutcome::Skipped(SkipReason::NoCutlistFound)));
    assert!(harness.prompt.prompts().is_empty());
    assert_eq!(harness.prompt.remaining(), 1);
}

#[tokio::test]
async fn test_falls_back_to_authored_lists() {
    let transport = MockTransportAdapter::new().with_failure(search_url());
    let harness = Harness::new(transport, &["1"]);
    harness
        .authored
        .update("show.avi", &format!("12:00:00 01.01.2010\n{}", CUTLIST))
        .unwrap();

    let outcome = harness.selection().choose(Path::new(VIDEO)).await.unwrap();
    let SelectionOutcome::Chosen(chosen) = outcome else {
        panic!("expected a chosen cut list, got {:?}", outcome);
    };
    assert_eq!(chosen.record.origin(), SourceKind::LocalAuthored);
    assert_eq!(chosen.output_name, "show-cut.avi");
}

#[tokio::test]
async fn test_illegal_index_repeats_prompt() {
    let harness = Harness::new(network_with_listing(), &["7", "x", ""]);
    let outcome = harness.selection().choose(Path::new(VIDEO)).await.unwrap();
    assert!(matches!(outcome, SelectionOutcome::Skipped(SkipReason::UserSkipped)));
    assert_eq!(harness.prompt.prompts().len(), 3);
}

#[tokio::test]
async fn test_preview_discards_choice() {
    let harness = Harness::new(network_with_listing(), &["test 1", ""]);
    let outcome = harness.selection().choose(Path::new(VIDEO)).await.unwrap();

    assert!(matches!(outcome, SelectionOutcome::Skipped(SkipReason::UserSkipped)));
    let jobs = harness.player.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].video, PathBuf::from(VIDEO));
    assert!(jobs[0].edl.starts_with("0.000000\t50.000000\t0\n"));
    assert!(jobs[0].subtitles.contains("=->CUT<-="));
}

#[tokio::test]
async fn test_show_raw_keeps_choice() {
    let harness = Harness::new(network_with_listing(), &["2 show-raw", ""]);
    let outcome = harness.selection().choose(Path::new(VIDEO)).await.unwrap();

    let SelectionOutcome::Chosen(chosen) = outcome else {
        panic!("expected a chosen cut list, got {:?}", outcome);
    };
    assert_eq!(chosen.record.id(), "1");
    assert!(harness.prompt.output().iter().any(|line| line == CUTLIST));
}

#[tokio::test]
async fn test_delete_after_confirmation() {
    let harness = Harness::new(network_with_listing(), &["delete", "y"]);
    let outcome = harness.selection().choose(Path::new(VIDEO)).await.unwrap();

    assert!(matches!(outcome, SelectionOutcome::Deleted));
    assert_eq!(harness.fs.deleted(), vec![PathBuf::from(VIDEO)]);
}

#[tokio::test]
async fn test_delete_declined() {
    let harness = Harness::new(network_with_listing(), &["delete", "n", ""]);
    let outcome = harness.selection().choose(Path::new(VIDEO)).await.unwrap();

    assert!(matches!(outcome, SelectionOutcome::Skipped(SkipReason::UserSkipped)));
    assert!(harness.fs.deleted().is_empty());
    assert!(harness.fs.content(Path::new(VIDEO)).is_some());
}

#[tokio::test]
async fn test_switch_source_and_author() {
    let harness = Harness::new(network_with_listing(), &["own n"]);
    let outcome = harness.selection().choose(Path::new(VIDEO)).await.unwrap();

    let SelectionOutcome::Chosen(chosen) = outcome else {
        panic!("expected a chosen cut list, got {:?}", outcome);
    };
    assert_eq!(chosen.record.origin(), SourceKind::LocalAuthored);
    assert_eq!(chosen.timing.cuts, vec![Cut::new(250, 500)]);
    assert_eq!(harness.editor.sessions(), vec![PathBuf::from(VIDEO)]);
    let output = harness.prompt.output();
    assert!(output.contains(&"Switching to source 'own'".to_string()));
    assert!(output.contains(&"Source 'own': Author your own cut lists.".to_string()));
    assert!(harness.authored.contains("show.avi"));
}

#[tokio::test]
async fn test_cut_list_from_file() {
    let fs = MockFsAdapter::new()
        .with_file(VIDEO, "video")
        .with_file("/lists/show.cutlist", CUTLIST);
    let harness = Harness::with_fs(network_with_listing(), &["file /lists/show.cutlist"], fs);

    let outcome = harness.selection().choose(Path::new(VIDEO)).await.unwrap();
    let SelectionOutcome::Chosen(chosen) = outcome else {
        panic!("expected a chosen cut list, got {:?}", outcome);
    };
    assert_eq!(chosen.record.origin(), SourceKind::FileSystem);
    assert_eq!(chosen.record.id(), "/lists/show.cutlist");
}

#[tokio::test]
async fn test_suggested_name_offered() {
    let suggested = format!("{}\r\n[Info]\r\nSuggestedMovieName=Great Show\r\n", CUTLIST);
    let transport = MockTransportAdapter::new()
        .with_response(search_url(), LISTING)
        .with_response(content_url("2"), suggested);
    let harness = Harness::new(transport, &["1", "2"]);

    let outcome = harness.selection().choose(Path::new(VIDEO)).await.unwrap();
    let SelectionOutcome::Chosen(chosen) = outcome else {
        panic!("expected a chosen cut list, got {:?}", outcome);
    };
    assert_eq!(chosen.output_name, "Great Show.avi");
    assert!(harness.prompt.output().contains(&"[1] show-cut450.avi".to_string()));
}

#[tokio::test]
async fn test_batch_exports_chosen_lists() {
    let fs = MockFsAdapter::new()
        .with_file(VIDEO, "video")
        .with_file("/videos/other.avi", "video");
    let transport = network_with_listing()
        .with_failure(format!("{}getxml.php?name=other.avi&version=0.9.8.0", BASE));
    let harness = Harness::with_fs(transport, &["1", ""], fs);

    let report = harness
        .batch(false)
        .execute(vec![PathBuf::from(VIDEO), PathBuf::from("/videos/other.avi")])
        .await
        .unwrap();

    assert_eq!(report.exported, vec![PathBuf::from("/cut/show.avi.cutlist")]);
    assert_eq!(report.skipped, vec![PathBuf::from("/videos/other.avi")]);
    let exported = harness.fs.content(Path::new("/cut/show.avi.cutlist")).unwrap();
    let timing = TimingModel::from_raw_text(&exported).unwrap();
    assert_eq!(timing.cuts, vec![Cut::new(1500, 750)]);
}

#[tokio::test]
async fn test_batch_continues_after_failed_export() {
    let fs = MockFsAdapter::new()
        .with_file(VIDEO, "video")
        .with_file("/videos/other.avi", "video")
        .with_file("/cut/other-cut450.avi", "cut video")
        .with_read_only("/cut/show.avi.cutlist");
    let transport = network_with_listing()
        .with_response(format!("{}getxml.php?name=other.avi&version=0.9.8.0", BASE), LISTING);
    let harness = Harness::with_fs(transport, &["1", "1", "", "", "", ""], fs);

    let report = harness
        .batch(true)
        .execute(vec![PathBuf::from(VIDEO), PathBuf::from("/videos/other.avi")])
        .await
        .unwrap();

    assert_eq!(report.failed, vec![PathBuf::from(VIDEO)]);
    assert_eq!(report.exported, vec![PathBuf::from("/cut/other.avi.cutlist")]);
    assert!(harness.fs.content(Path::new("/cut/other.avi.cutlist")).is_some());
    assert!(harness.fs.content(Path::new("/cut/show.avi.cutlist")).is_none());
    // only the exported file takes part in the check phase
    assert_eq!(report.checked, vec![PathBuf::from("/videos/other.avi")]);
    let jobs = harness.player.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].video, PathBuf::from("/cut/other-cut450.avi"));
}

#[tokio::test]
async fn test_batch_checks_cut_output() {
    let fs = MockFsAdapter::new()
        .with_file(VIDEO, "video")
        .with_file("/cut/show-cut450.avi", "cut video");
    let harness = Harness::with_fs(network_with_listing(), &["1", "", "", "3", ""], fs);

    let report = harness.batch(true).execute(vec![PathBuf::from(VIDEO)]).await.unwrap();

    assert_eq!(report.checked, vec![PathBuf::from(VIDEO)]);
    let jobs = harness.player.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].video, PathBuf::from("/cut/show-cut450.avi"));
    assert!(harness
        .transport
        .requests()
        .contains(&format!("{}rate.php?rate=2&rating=3", BASE)));
}
