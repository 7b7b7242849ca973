// src/audio_io.rs

use crate::audio_engine::{AudioCommand, SignalChain, StreamEngine, COMMAND_QUEUE_CAPACITY};
use crate::config::AppConfig;
use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Device, FromSample, Sample, SampleFormat, Stream, StreamConfig};
use log::{error, info, warn};
use ringbuf::HeapRb;

/// Picks the configured output device by name, falling back to the default
/// device when nothing is configured or the configured one is gone.
pub fn pick_output_device<D>(
    configured: Option<&str>,
    devices: impl IntoIterator<Item = (String, D)>,
    default_device: impl FnOnce() -> Option<D>,
) -> Result<D> {
    if let Some(name) = configured {
        if let Some((_, device)) = devices.into_iter().find(|(d_name, _)| d_name == name) {
            return Ok(device);
        }
        warn!("Output device not found: {}. Falling back to the default device.", name);
    }
    default_device().ok_or_else(|| anyhow::anyhow!("No default output device"))
}

/// Human-readable buffer size for the status line; `None` is the host default.
pub fn describe_buffer_size(buffer_size: Option<u32>) -> String {
    match buffer_size {
        Some(size) => format!("{} samples", size),
        None => "default buffer".to_string(),
    }
}

/// Opens the configured (or default) output device and starts the noise chain on it.
///
/// Returns the UI-side engine handle, the running stream (keep it alive), the
/// active sample rate and the fixed buffer size, if one was requested.
pub fn init_and_run_stream(config: &AppConfig) -> Result<(StreamEngine, Stream, u32, Option<u32>)> {
    let host = cpal::default_host();
    let output_device = match &config.output_device {
        Some(name) => {
            let devices = host
                .output_devices()?
                .filter_map(|d| d.name().ok().map(|d_name| (d_name, d)));
            pick_output_device(Some(name.as_str()), devices, || host.default_output_device())?
        }
        None => pick_output_device(None, Vec::new(), || host.default_output_device())?,
    };
    info!("Using output device: {}", output_device.name()?);

    let default_output_config = output_device.default_output_config()?;
    let sample_format = default_output_config.sample_format();

    let mut final_output_config: StreamConfig = default_output_config.into();
    if let Some(sr) = config.sample_rate {
        final_output_config.sample_rate = cpal::SampleRate(sr);
    }
    if let Some(bs) = config.buffer_size {
        final_output_config.buffer_size = BufferSize::Fixed(bs);
    }

    let (command_producer, command_consumer) =
        HeapRb::<AudioCommand>::new(COMMAND_QUEUE_CAPACITY).split();
    let chain = SignalChain::new(command_consumer, final_output_config.sample_rate.0 as f32);

    let output_stream = match sample_format {
        SampleFormat::F32 => {
            build_output_stream::<f32>(&output_device, &final_output_config, chain)?
        }
        SampleFormat::I16 => {
            build_output_stream::<i16>(&output_device, &final_output_config, chain)?
        }
        SampleFormat::U16 => {
            build_output_stream::<u16>(&output_device, &final_output_config, chain)?
        }
        format => return Err(anyhow::anyhow!("Unsupported sample format {}", format)),
    };
    output_stream.play()?;

    let active_sr = final_output_config.sample_rate.0;
    let active_bs = match final_output_config.buffer_size {
        BufferSize::Fixed(size) => Some(size),
        BufferSize::Default => None,
    };

    info!(
        "Successfully started output stream with Sample Rate: {} Hz, Buffer Size: {}",
        active_sr,
        describe_buffer_size(active_bs)
    );

    Ok((StreamEngine::new(command_producer), output_stream, active_sr, active_bs))
}

fn build_output_stream<T>(
    device: &Device,
    config: &StreamConfig,
    mut chain: SignalChain,
) -> Result<Stream>
where
    T: Sample + cpal::SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let err_fn = |err: cpal::StreamError| error!("an error occurred on output stream: {}", err);
    let mut mono_buffer: Vec<f32> = vec![];

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            chain.handle_commands();
            let num_frames = data.len() / channels;
            mono_buffer.resize(num_frames, 0.0);
            chain.process_buffer(&mut mono_buffer);
            for (frame, &sample_value) in data.chunks_mut(channels).zip(mono_buffer.iter()) {
                for sample in frame.iter_mut() {
                    *sample = T::from_sample(sample_value);
                }
            }
        },
        err_fn,
        None,
    )?;
    Ok(stream)
}
