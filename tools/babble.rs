/// Babble — builds a corpus from text and prints generated sentences.
///
/// Usage: babble [--input <file.txt>]... [--config <config.ron>] [--seed <n>]
///               [--count <n>] [--conversation] [--show]
///
/// Each input line is ingested as a document; stdin is read when no
/// input file is given. Sentences cycle question, declaration, fact.
use phrase_engine::core::config::CorpusConfig;
use phrase_engine::core::conversation::add_all_conversation;
use phrase_engine::core::corpus::Corpus;
use phrase_engine::schema::token::Category;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: babble [--input <file.txt>]... [--config <config.ron>] [--seed <n>] [--count <n>] [--conversation] [--show]";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut inputs = Vec::new();
    let mut config_path = None;
    let mut seed = None;
    let mut count = 6usize;
    let mut conversation = false;
    let mut show = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" if i + 1 < args.len() => {
                i += 1;
                inputs.push(args[i].clone());
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = Some(args[i].parse::<u64>().unwrap_or_else(|_| {
                    eprintln!("Error: --seed must be a non-negative integer");
                    process::exit(1);
                }));
            }
            "--count" if i + 1 < args.len() => {
                i += 1;
                count = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --count must be a non-negative integer");
                    process::exit(1);
                });
            }
            "--conversation" => conversation = true,
            "--show" => show = true,
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(ref path) => CorpusConfig::load_from_ron(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Error loading config '{}': {}", path, e);
            process::exit(1);
        }),
        None => CorpusConfig::default(),
    };

    let mut corpus = Corpus::with_config(config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    if conversation {
        add_all_conversation(&mut corpus);
    }

    if inputs.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.unwrap_or_else(|e| {
                eprintln!("Error reading stdin: {}", e);
                process::exit(1);
            });
            corpus.add_document(&line);
        }
    } else {
        for input in &inputs {
            let text = std::fs::read_to_string(input).unwrap_or_else(|e| {
                eprintln!("Error reading input file '{}': {}", input, e);
                process::exit(1);
            });
            for line in text.lines() {
                corpus.add_document(line);
            }
        }
    }

    corpus.strip_stray_tokens();
    corpus.fix_casing();
    tracing::info!(
        nodes = corpus.counts().node_count(),
        words = corpus.word_set().len(),
        "corpus ready"
    );

    if show {
        print!("{}", corpus.counts());
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for i in 0..count {
        let sentence = corpus.generate_sentence(Category::cycle(i), &mut rng);
        println!("{}: {}", i, sentence.text);
    }
}
