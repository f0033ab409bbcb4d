//! Command-line interface for dataset preparation and autoencoder training.
//!
//! The CLI wraps the library to provide model training, batch English-to-IPA
//! conversion of the manifest, and an interactive review pass over converted
//! transcriptions.

use anyhow::Result;
use burn::backend::Autodiff;
use burn::module::AutodiffModule;
use burn::optim::SgdConfig;
use burn::tensor::backend::AutodiffBackend;
use burn_ndarray::{NdArray, NdArrayDevice};
use clap::{Parser, Subcommand, ValueEnum};
use phonegen::audio::sizing::largest_waveform_size;
use phonegen::checkpoint::{load_or_init, save_checkpoint, ModelSource};
use phonegen::dataset::AudioEncoderDataset;
use phonegen::ipa::transcribe::DictionaryTranscriber;
use phonegen::ipa::update_manifest;
use phonegen::manifest::read_manifest;
use phonegen::model::PerceptronConfig;
use phonegen::perf::{self, Metric};
use phonegen::review::{ConsoleReview, ReviewSession};
use phonegen::training::{eval_epoch, train_epoch};
use std::path::PathBuf;

#[cfg(feature = "backend-wgpu")]
use burn_wgpu::graphics::AutoGraphicsApi;
#[cfg(feature = "backend-wgpu")]
use burn_wgpu::{init_setup, Wgpu, WgpuDevice};

/// Supported compute backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum BackendChoice {
    /// Use the WGPU backend (GPU acceleration when available).
    Wgpu,
    /// Use the ndarray backend (CPU).
    Ndarray,
}

#[cfg(feature = "backend-wgpu")]
const DEFAULT_BACKEND: BackendChoice = BackendChoice::Wgpu;
#[cfg(not(feature = "backend-wgpu"))]
const DEFAULT_BACKEND: BackendChoice = BackendChoice::Ndarray;

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "phonegen")]
#[command(about = "Phoneme dataset preparation and autoencoder training", long_about = None)]
struct Cli {
    /// Print performance summary at the end of the run.
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Compute backend to use.
    #[arg(long, value_enum, default_value_t = DEFAULT_BACKEND, global = true)]
    backend: BackendChoice,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Train the waveform autoencoder from a manifest and clip corpus.
    Train {
        /// The TSV manifest to train from.
        manifest: PathBuf,
        /// Directory containing the sentence WAV clips.
        clip_dir: PathBuf,
        /// Directory containing one subdirectory of clips per phoneme.
        phoneme_dir: PathBuf,
        /// Number of hidden layers in the perceptron.
        #[arg(long, default_value_t = 1)]
        layer_count: usize,
        /// Number of neurons in each hidden layer.
        #[arg(long, default_value_t = 3000)]
        layer_size: usize,
        /// SGD learning rate.
        #[arg(long, default_value_t = 0.01)]
        learning_rate: f64,
        /// Minibatch size.
        #[arg(long, default_value_t = 32)]
        batch_size: usize,
        /// Maximum number of training epochs.
        #[arg(long, default_value_t = 10)]
        epochs: usize,
        /// Fixed waveform sample count, skipping the corpus scan.
        #[arg(long)]
        wave_size: Option<usize>,
        /// Stop once the absolute epoch loss drops to this value.
        #[arg(long, default_value_t = 10.0)]
        loss_threshold: f32,
        /// Checkpoint path; training resumes from it when it exists.
        #[arg(long, default_value = "encoder_model.safetensors")]
        output: PathBuf,
    },
    /// Convert manifest sentences to IPA and drop unresolved rows.
    Ipa {
        /// The TSV manifest to update in place.
        manifest: PathBuf,
        /// JSON lexicon mapping words to IPA transcriptions.
        #[arg(long)]
        lexicon: PathBuf,
        /// Number of entries to queue up per progress chunk.
        #[arg(long, default_value_t = 256)]
        chunk_size: usize,
    },
    /// Review converted transcriptions page by page on the console.
    Review {
        /// The TSV manifest to review and update in place.
        manifest: PathBuf,
        /// Number of rows shown per page.
        #[arg(long, default_value_t = 10)]
        page_size: usize,
    },
}

#[derive(Debug, Clone)]
struct TrainArgs {
    manifest: PathBuf,
    clip_dir: PathBuf,
    phoneme_dir: PathBuf,
    layer_count: usize,
    layer_size: usize,
    learning_rate: f64,
    batch_size: usize,
    epochs: usize,
    wave_size: Option<usize>,
    loss_threshold: f32,
    output: PathBuf,
}

/// Entry point for the CLI.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let backend = cli.backend;

    match cli.command {
        Commands::Train {
            manifest,
            clip_dir,
            phoneme_dir,
            layer_count,
            layer_size,
            learning_rate,
            batch_size,
            epochs,
            wave_size,
            loss_threshold,
            output,
        } => {
            let args = TrainArgs {
                manifest,
                clip_dir,
                phoneme_dir,
                layer_count,
                layer_size,
                learning_rate,
                batch_size,
                epochs,
                wave_size,
                loss_threshold,
                output,
            };
            match backend {
                BackendChoice::Wgpu => {
                    #[cfg(feature = "backend-wgpu")]
                    {
                        let device = WgpuDevice::default();
                        init_setup::<AutoGraphicsApi>(&device, Default::default());
                        run_train::<Autodiff<Wgpu>>(args, &device)?;
                    }
                    #[cfg(not(feature = "backend-wgpu"))]
                    {
                        let _ = args;
                        anyhow::bail!("WGPU backend not enabled; build with --features backend-wgpu");
                    }
                }
                BackendChoice::Ndarray => {
                    let device = NdArrayDevice::default();
                    run_train::<Autodiff<NdArray<f32>>>(args, &device)?;
                }
            }
        }
        Commands::Ipa {
            manifest,
            lexicon,
            chunk_size,
        } => {
            let transcriber = DictionaryTranscriber::from_file(&lexicon)?;
            let kept = update_manifest(&manifest, &transcriber, chunk_size)?;
            println!("{} fully resolved rows written to {}", kept.len(), manifest.display());
        }
        Commands::Review {
            manifest,
            page_size,
        } => {
            let entries = read_manifest(&manifest)?;
            let session = ReviewSession::new(&manifest, entries, page_size);
            let mut surface = ConsoleReview;
            session.run(&mut surface)?;
        }
    }

    if verbose {
        eprintln!("{}", perf::report());
    }

    Ok(())
}

fn run_train<B: AutodiffBackend>(args: TrainArgs, device: &B::Device) -> Result<()> {
    let wave_size = match args.wave_size {
        Some(size) => size,
        None => {
            let _span = perf::span(Metric::CorpusScan);
            largest_waveform_size(&args.phoneme_dir)?
        }
    };
    println!("The largest waveform size is {wave_size}");

    let dataset = AudioEncoderDataset::new(
        &args.manifest,
        &args.clip_dir,
        &args.phoneme_dir,
        wave_size,
    )?;

    let source = if args.output.exists() {
        ModelSource::Resume(args.output.clone())
    } else {
        ModelSource::Fresh(PerceptronConfig::uniform(
            wave_size,
            args.layer_count,
            args.layer_size,
            false,
        ))
    };
    let (model, config) = load_or_init::<B>(source, device)?;
    if config.input_size != wave_size {
        anyhow::bail!(
            "checkpoint was trained with waveform size {}, but this corpus needs {wave_size}; \
             pass --wave-size {} to match",
            config.input_size,
            config.input_size
        );
    }

    let mut optimizer = SgdConfig::new().init();
    let (mut model, mut loss) = train_epoch(
        &dataset,
        model,
        &mut optimizer,
        args.learning_rate,
        args.batch_size,
        device,
    )?;

    let mut epoch = 0;
    while loss.abs() > args.loss_threshold && epoch < args.epochs {
        println!(
            "{}x{}: training iteration {epoch}, loss {loss}",
            args.layer_count, args.layer_size
        );
        let step = train_epoch(
            &dataset,
            model,
            &mut optimizer,
            args.learning_rate,
            args.batch_size,
            device,
        )?;
        model = step.0;
        loss = step.1;
        println!("Training error: {loss}");
        epoch += 1;
    }

    let eval_loss = eval_epoch(&dataset, &model.valid(), args.batch_size, device)?;
    println!("Evaluation error: {eval_loss}");

    save_checkpoint(&args.output, &model.valid(), &config, dataset.labels())?;
    println!("Saved checkpoint to {}", args.output.display());
    Ok(())
}
