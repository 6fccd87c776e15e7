// Copyright 2018-2019 Mozilla
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use
// this file except in compliance with the License. You may obtain a copy of the
// License at http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software distributed
// under the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR
// CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use url::Url;

use crate::error::StoreError;

/// Strip the username and password from a connection URI so that it can be
/// logged or put in an error. Errors never echo the input.
///
/// The authority may be a comma-separated seed list
/// (`mongodb://u:p@h1:27017,h2:27017/app`), which `Url` can't parse as a
/// whole, so userinfo is removed by hand and each host is checked on its own.
pub fn redact(uri: &str, schemes: &[&str]) -> Result<String, StoreError> {
    let (scheme, rest) = uri.split_once("://").ok_or_else(|| StoreError::InvalidUri("missing scheme".to_owned()))?;
    if !schemes.contains(&scheme) {
        let shown = if is_scheme(scheme) {
            scheme
        } else {
            "<malformed>"
        };
        return Err(StoreError::InvalidUri(format!("unsupported scheme `{}`", shown)));
    }

    let (authority, tail) = rest.split_at(rest.find(|c: char| c == '/' || c == '?').unwrap_or(rest.len()));
    let hosts = authority.rsplit_once('@').map_or(authority, |(_, hosts)| hosts);

    for (i, host) in hosts.split(',').enumerate() {
        // The path and query are checked along with the first host.
        let candidate = if i == 0 {
            format!("{}://{}{}", scheme, host, tail)
        } else {
            format!("{}://{}", scheme, host)
        };
        Url::parse(&candidate).map_err(|e| StoreError::InvalidUri(e.to_string()))?;
    }

    Ok(format!("{}://{}{}", scheme, hosts, tail))
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().map_or(false, |c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
}
