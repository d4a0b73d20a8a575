#[macro_export]
macro_rules! opt {
    (, $default:ident) => {
        $default
    };
    ($optional:expr, $default:ident) => {
        $optional
    };
}

#[macro_export]
macro_rules! params_internal {
    ($vec:ident, required, $key:expr, $val:expr) => {
        $vec.push(($key, $val.to_string()));
    };
    ($vec:ident, optional, $key:expr, $val:expr) => {
        if let Some(ref v) = $val {
            $vec.push(($key, v.to_string()));
        }
    };
    ($vec:ident, search, $key:expr, $val:expr) => {
        $vec.push((format!("search[{}]", $key), $val.to_string()));
    };
    ($vec:ident, search_list, $key:expr, $val:expr) => {
        $vec.push((format!("search[{}]", $key), $crate::join_values($val.iter())));
    };
}

/// Build query params for e621 API endpoints. Example:
/// ```
/// use bell_util::build_params;
///
/// let ids = [1u64, 2, 3];
/// let limit = 3;
/// let page: Option<u32> = None;
/// let params = build_params! {
///     search_list id => ids,
///     required limit,
///     optional page,
/// };
/// assert_eq!(params[0], ("search[id]".to_string(), "1,2,3".to_string()));
/// assert_eq!(params.len(), 2);
/// ```
///
/// `search` wraps the key as `search[key]`, `search_list` additionally joins
/// the values with commas.
#[macro_export]
macro_rules! build_params {
    (
        $(
            $kind:ident $name:ident $( => $val:expr )?
        ),+ $(,)?
    ) => {
        {
            let mut params: Vec<(String, String)> = Vec::new();
            $(
                $crate::params_internal!(
                    params,
                    $kind,
                    stringify!($name).to_string(),
                    $crate::opt!($( $val )?, $name)
                );
            )+
            params
        }
    };
}

/// Join displayable values with commas, the list format the API expects.
pub fn join_values<T: ToString>(values: impl Iterator<Item = T>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_build_params_kinds() {
        let login = Some("alice");
        let api_key: Option<&str> = None;
        let params = build_params! {
            search name => "foo_bar",
            optional login,
            optional api_key,
            required limit => 75,
        };
        assert_eq!(
            params,
            vec![
                ("search[name]".to_string(), "foo_bar".to_string()),
                ("login".to_string(), "alice".to_string()),
                ("limit".to_string(), "75".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_list_joins_with_commas() {
        let ids: Vec<u64> = vec![5, 10, 42];
        let params = build_params! { search_list id => ids };
        assert_eq!(params, vec![("search[id]".to_string(), "5,10,42".to_string())]);
    }
}
