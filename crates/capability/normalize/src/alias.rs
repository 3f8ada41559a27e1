use domain::{Payload, RawEvent};
use std::collections::HashMap;

/// alias 的作用域：边缘节点自身或其下的某个设备。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasScope {
    pub group_id: String,
    pub edge_node_id: String,
    pub device_id: Option<String>,
}

impl AliasScope {
    pub fn of(event: &RawEvent) -> Self {
        Self {
            group_id: event.group_id.clone(),
            edge_node_id: event.edge_node_id.clone(),
            device_id: event.device_id.clone(),
        }
    }

    fn same_node(&self, other: &Self) -> bool {
        self.group_id == other.group_id && self.edge_node_id == other.edge_node_id
    }
}

/// BIRTH 报文建立的 alias → name 映射。
///
/// 每次 BIRTH 都会替换该作用域下的整张表；NDEATH 清除节点及其全部设备，DDEATH 只清除该设备。
#[derive(Debug, Default)]
pub struct AliasTable {
    scopes: HashMap<AliasScope, HashMap<u64, String>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录报文中同时带 name 与 alias 的指标，返回学到的条目数。
    pub fn learn(&mut self, scope: AliasScope, payload: &Payload) -> usize {
        let aliases: HashMap<u64, String> = payload
            .metrics
            .iter()
            .filter_map(|metric| Some((metric.alias?, metric.name.clone()?)))
            .collect();
        let learned = aliases.len();
        self.scopes.insert(scope, aliases);
        learned
    }

    pub fn resolve(&self, scope: &AliasScope, alias: u64) -> Option<&str> {
        self.scopes
            .get(scope)
            .and_then(|aliases| aliases.get(&alias))
            .map(String::as_str)
    }

    /// 清除作用域；节点级作用域同时清除其下所有设备。
    pub fn forget(&mut self, scope: &AliasScope) {
        match scope.device_id {
            Some(_) => {
                self.scopes.remove(scope);
            }
            None => self.scopes.retain(|candidate, _| !candidate.same_node(scope)),
        }
    }

    /// 已登记的作用域数。
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
