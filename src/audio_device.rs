//! Output device selection and the rodio stream the deck plays into.
use color_eyre::{Result, eyre::WrapErr};
use cpal::{
    Device, default_host,
    traits::{DeviceTrait, HostTrait},
};
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{info, warn};

use crate::audio_player::TransportSource;

pub struct AudioOutput {
    // dropping the stream silences the sink
    _stream: OutputStream,
    sink: Sink,
    device_name: String,
}

impl AudioOutput {
    /// Opens `preferred` by name, or the default device when it is `None`,
    /// `"default"` or not present.
    pub fn open(preferred: Option<&str>) -> Result<Self> {
        let device = match preferred {
            Some(name) if name != "default" => {
                let found = find_output_dev(name);
                if found.is_none() {
                    warn!(device = name, "output device not found, using default");
                }
                found
            }
            _ => None,
        };

        let device_name = match &device {
            Some(dev) => dev.name().ok(),
            None => default_host()
                .default_output_device()
                .and_then(|dev| dev.name().ok()),
        }
        .unwrap_or_else(|| String::from("<unknown>"));
        let builder = match device {
            Some(dev) => OutputStreamBuilder::from_device(dev),
            None => OutputStreamBuilder::from_default_device(),
        }
        .wrap_err("no usable audio output device")?;
        let mut stream = builder
            .open_stream()
            .wrap_err("failed to open audio output stream")?;
        stream.log_on_drop(false);

        let sink = Sink::connect_new(stream.mixer());
        info!(device = %device_name, "audio output opened");
        Ok(Self {
            _stream: stream,
            sink,
            device_name,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Swaps whatever is playing for `source`.
    pub fn play(&self, source: TransportSource) {
        // clear() also pauses the sink
        self.sink.clear();
        self.sink.append(source);
        self.sink.play();
    }
}

fn find_output_dev(name: &str) -> Option<Device> {
    list_output_devs()
        .into_iter()
        .find(|(dev_name, _)| dev_name == name)
        .map(|(_, dev)| dev)
}

pub fn list_output_devs() -> Vec<(String, Device)> {
    let host = default_host();
    let Ok(devices) = host.output_devices() else {
        return Vec::new();
    };
    let mut devs: Vec<(String, Device)> = devices
        .map(|dev| {
            (
                dev.name().unwrap_or_else(|_| String::from("<unknown>")),
                dev,
            )
        })
        .collect();
    devs.sort_by(|(n1, _), (n2, _)| n1.cmp(n2));
    devs
}
