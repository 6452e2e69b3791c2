//! [`ParameterStore`] backed by AWS Systems Manager Parameter Store.
//!
//! Credentials and region come from the standard AWS config chain
//! (environment, shared profiles, SSO, IMDS). The SDK is async. The store
//! drives it on its own current-thread runtime, so the edit loop stays a
//! plain sequential program.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::types::{Parameter, ParameterType};
use aws_sdk_ssm::Client;
use log::{debug, warn};
use tokio::runtime::{Builder, Runtime};

use crate::entry::{Entry, EntryKind, Prefix};
use crate::error::{Error, Result};
use crate::store::{Page, ParameterStore, WriteMode};

pub struct SsmStore {
    runtime: Runtime,
    client: Client,
}

impl SsmStore {
    /// Connects using the default AWS config chain.
    ///
    /// `region` and `profile` override what the environment would pick.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Runtime`] if the async runtime cannot be started.
    pub fn connect(region: Option<&str>, profile: Option<&str>) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }

        let config = runtime.block_on(loader.load());
        debug!(
            "Using AWS region {}",
            config
                .region()
                .map_or_else(|| "<unset>".to_string(), ToString::to_string)
        );

        Ok(Self {
            runtime,
            client: Client::new(&config),
        })
    }
}

fn kind_from_type(parameter_type: Option<&ParameterType>) -> EntryKind {
    match parameter_type {
        Some(ParameterType::SecureString) => EntryKind::Secret,
        Some(ParameterType::StringList) => EntryKind::List,
        _ => EntryKind::Plain,
    }
}

fn type_from_kind(kind: EntryKind) -> ParameterType {
    match kind {
        EntryKind::Plain => ParameterType::String,
        EntryKind::List => ParameterType::StringList,
        EntryKind::Secret => ParameterType::SecureString,
    }
}

fn entry_from_parameter(parameter: &Parameter) -> Option<Entry> {
    let Some(name) = parameter.name() else {
        warn!("Skipping parameter without a name");
        return None;
    };

    Some(Entry::new(
        name,
        parameter.value().unwrap_or_default(),
        kind_from_type(parameter.r#type()),
    ))
}

impl ParameterStore for SsmStore {
    fn fetch_page(&self, prefix: &Prefix, next_token: Option<String>) -> Result<Page> {
        let request = self
            .client
            .get_parameters_by_path()
            .path(prefix.as_str())
            .recursive(false)
            .with_decryption(true)
            .set_next_token(next_token);

        let output = self
            .runtime
            .block_on(request.send())
            .map_err(|e| Error::remote("list", prefix.as_str(), DisplayErrorContext(&e).to_string()))?;

        Ok(Page {
            entries: output
                .parameters()
                .iter()
                .filter_map(entry_from_parameter)
                .collect(),
            next_token: output
                .next_token()
                .filter(|token| !token.is_empty())
                .map(ToString::to_string),
        })
    }

    fn put(&self, entry: &Entry, mode: WriteMode) -> Result<()> {
        debug!("Writing `{}` as {} ({:?})", entry.name, entry.kind, mode);

        let request = self
            .client
            .put_parameter()
            .name(&entry.name)
            .value(&entry.value)
            .r#type(type_from_kind(entry.kind))
            .overwrite(mode.allows_overwrite());

        match self.runtime.block_on(request.send()) {
            Ok(_) => Ok(()),
            Err(sdk_err) => {
                if let Some(service_err) = sdk_err.as_service_error() {
                    if service_err.is_parameter_already_exists() {
                        return Err(Error::AlreadyExists {
                            name: entry.name.clone(),
                        });
                    }
                }
                Err(Error::remote(
                    "put",
                    &entry.name,
                    DisplayErrorContext(&sdk_err).to_string(),
                ))
            }
        }
    }
}
