use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_GROUP: &str = "all";

/// One labelled time series; only its most recent value is displayed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    pub ref_id: String,
    pub labels: BTreeMap<String, String>,
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }
}

/// Every series that resolved to the same node id inside one group.
#[derive(Debug, Clone, PartialEq)]
pub struct Host {
    pub id: String,
    pub series: Vec<Series>,
}

impl Host {
    pub fn latest(&self) -> Option<f64> {
        self.series.first().and_then(Series::latest)
    }

    /// Labels of all series merged, later series winning on conflicts.
    pub fn merged_labels(&self) -> BTreeMap<String, String> {
        let mut merged = BTreeMap::new();
        for series in &self.series {
            for (key, value) in &series.labels {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostGroup {
    pub name: String,
    pub hosts: Vec<Host>,
}

pub fn label_key(labels: &BTreeMap<String, String>) -> String {
    labels
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(";")
}

/// Buckets series into groups by `group_label` and into hosts by
/// `node_id_label`. Groups and hosts keep first-seen order so that row and
/// column assignment is stable across renders of the same input.
pub fn group_by(series: &[Series], group_label: &str, node_id_label: &str) -> Vec<HostGroup> {
    let mut groups: Vec<HostGroup> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut host_index: Vec<HashMap<String, usize>> = Vec::new();

    for item in series {
        let group_name = item
            .labels
            .get(group_label)
            .filter(|value| !group_label.is_empty() && !value.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_GROUP.to_string());
        let node_id = if node_id_label.is_empty() {
            label_key(&item.labels)
        } else {
            item.labels.get(node_id_label).cloned().unwrap_or_default()
        };

        let gi = *group_index.entry(group_name.clone()).or_insert_with(|| {
            groups.push(HostGroup {
                name: group_name,
                hosts: Vec::new(),
            });
            host_index.push(HashMap::new());
            groups.len() - 1
        });

        let group = &mut groups[gi];
        match host_index[gi].get(&node_id) {
            Some(&hi) => group.hosts[hi].series.push(item.clone()),
            None => {
                host_index[gi].insert(node_id.clone(), group.hosts.len());
                group.hosts.push(Host {
                    id: node_id,
                    series: vec![item.clone()],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(ref_id: &str, labels: &[(&str, &str)], value: f64) -> Series {
        Series {
            ref_id: ref_id.to_string(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            values: vec![Some(value)],
        }
    }

    #[test]
    fn groups_in_first_seen_order() {
        let input = vec![
            series("A", &[("dc", "us"), ("host", "b")], 1.0),
            series("A", &[("dc", "eu"), ("host", "a")], 2.0),
            series("A", &[("dc", "us"), ("host", "c")], 3.0),
        ];
        let groups = group_by(&input, "dc", "host");
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["us", "eu"]);
        let us: Vec<&str> = groups[0].hosts.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(us, vec!["b", "c"]);
    }

    #[test]
    fn missing_group_label_falls_back_to_all() {
        let input = vec![series("A", &[("host", "a")], 1.0)];
        let groups = group_by(&input, "", "host");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, DEFAULT_GROUP);

        let groups = group_by(&input, "rack", "host");
        assert_eq!(groups[0].name, DEFAULT_GROUP);
    }

    #[test]
    fn series_with_same_node_collapse_into_one_host() {
        let input = vec![
            series("cpu", &[("host", "a")], 0.5),
            series("mem", &[("host", "a"), ("kind", "ram")], 0.7),
        ];
        let groups = group_by(&input, "", "host");
        assert_eq!(groups[0].hosts.len(), 1);
        let host = &groups[0].hosts[0];
        assert_eq!(host.series.len(), 2);
        assert_eq!(host.latest(), Some(0.5));
        assert_eq!(host.merged_labels().get("kind").map(String::as_str), Some("ram"));
    }

    #[test]
    fn node_id_defaults_to_label_key() {
        let input = vec![series("A", &[("job", "node"), ("instance", "x:9100")], 1.0)];
        let groups = group_by(&input, "", "");
        assert_eq!(groups[0].hosts[0].id, "instance=x:9100;job=node");
    }
}
