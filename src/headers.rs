//! Sender, recipient and subject resolution from header lines

use crate::error::{ExtractError, Result};
use crate::pattern::{EMAIL_ADDRESS, compiled};
use crate::types::Header;
use mailparse::{MailAddr, MailAddrList};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Basic addressing information taken from a header list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfo {
    /// Address in the last `From` header, `None` if that header holds no address
    pub from: Option<String>,

    /// Address in the last `To` header, `None` if that header holds no address
    pub to: Option<String>,

    /// Every `Subject` header, in encounter order
    pub subject: Vec<String>,
}

/// Scan header lines once, collecting `From`, `To` and all `Subject` values.
///
/// Header names are matched exactly, as the provider delivers them. An entry
/// without a `name` or `value` is a [`ExtractError::MissingKey`]. A repeated
/// `From` or `To` replaces the earlier one, even when it carries no address.
pub fn resolve(headers: &[Header]) -> Result<BasicInfo> {
    info!("Collecting basic email data from headers");

    let mut basic = BasicInfo::default();

    for (index, header) in headers.iter().enumerate() {
        let name = header
            .name
            .as_deref()
            .ok_or_else(|| ExtractError::MissingKey(format!("headers[{index}].name")))?;
        let value = header
            .value
            .as_deref()
            .ok_or_else(|| ExtractError::MissingKey(format!("headers[{index}].value")))?;

        match name {
            "From" => {
                basic.from = extract_address(value)?;
                debug!("Message from: {:?}", basic.from);
            }
            "To" => {
                basic.to = extract_address(value)?;
                debug!("Message to: {:?}", basic.to);
            }
            "Subject" => basic.subject.push(value.to_string()),
            _ => {}
        }
    }

    debug!("Collected {} subject line(s)", basic.subject.len());
    Ok(basic)
}

/// Pull the bare mailbox out of an address header, ignoring any display name
pub fn extract_address(value: &str) -> Result<Option<String>> {
    if let Some(address) = mailparse::addrparse(value)
        .ok()
        .as_ref()
        .and_then(first_mailbox)
    {
        return Ok(Some(address));
    }

    let loose = compiled(&EMAIL_ADDRESS)?;
    Ok(loose.find(value).map(|found| found.as_str().to_string()))
}

fn first_mailbox(list: &MailAddrList) -> Option<String> {
    list.iter()
        .find_map(|addr| match addr {
            MailAddr::Single(single) => Some(single.addr.trim()),
            MailAddr::Group(group) => group.addrs.first().map(|single| single.addr.trim()),
        })
        .filter(|addr| addr.contains('@'))
        .map(str::to_string)
}
