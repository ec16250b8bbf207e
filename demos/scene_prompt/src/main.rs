use argh::FromArgs;
use std::{fs::File, io::BufReader, path::PathBuf};

use kornia_scene::{
    compose_vlm_prompt, format_prompt, read_frame_records, RelationshipEngine,
    RelationshipEngineConfig, SceneQuery,
};

#[derive(FromArgs)]
/// Build scene prompts for a vision-language model from object detections
struct Args {
    /// path to a json file with one frame or a list of frames
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to a json file with the engine configuration
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// free-text question about the scene
    #[argh(option, short = 'q')]
    question: Option<String>,

    /// preset question, one of `describe` or `count`
    #[argh(option)]
    preset: Option<SceneQuery>,

    /// write the question into the scene prompt instead of appending a question line
    #[argh(switch)]
    embed: bool,

    /// print the frame results as json
    #[argh(switch)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = match &args.config {
        Some(path) => RelationshipEngineConfig::from_json_file(path)?,
        None => RelationshipEngineConfig::default(),
    };
    let engine = RelationshipEngine::new(config)?;

    let query = match (args.question, args.preset) {
        (Some(_), Some(_)) => return Err("use either --question or --preset, not both".into()),
        (Some(question), None) => Some(SceneQuery::Custom(question)),
        (None, preset) => preset,
    };

    let records = read_frame_records(BufReader::new(File::open(&args.input)?))?;
    log::info!("Loaded {} frames from {:?}", records.len(), args.input);

    for (index, record) in records.into_iter().enumerate() {
        // invalid frames are skipped, the rest of the stream goes on
        let result = match record.and_then(|record| engine.process_record(record, None)) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Skipping frame at position {index}: {e}");
                continue;
            }
        };

        log::debug!(
            "Frame {}: {} objects, {} relationships",
            result.frame_id(),
            result.num_objects(),
            result.relationships().len()
        );

        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
            continue;
        }

        let text = match &query {
            Some(query) if args.embed => format_prompt(&result, Some(query.text())),
            Some(query) => compose_vlm_prompt(result.prompt(), query),
            None => result.prompt().to_string(),
        };

        println!("=== frame {} ===", result.frame_id());
        println!("{text}");
    }

    Ok(())
}
