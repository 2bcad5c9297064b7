//! 自定义指标目录 - 业务能力层
//!
//! 通过简单的键值持久化契约保存自定义指标定义，提交解析流程不依赖本模块

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::models::CustomMetricDefinition;

/// 自定义指标定义的持久化契约
///
/// 以整数 id 为键，codeName 全局唯一。
pub trait CustomMetricProvider {
    /// 按 id 读取
    fn get(&self, id: i32) -> Option<CustomMetricDefinition>;

    /// 新建或更新，返回保存后的 id
    fn save(&mut self, definition: CustomMetricDefinition) -> Result<i32, CatalogError>;

    /// 删除
    fn delete(&mut self, definition: &CustomMetricDefinition) -> Result<(), CatalogError>;
}

/// 内存中的自定义指标目录
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    definitions: BTreeMap<i32, CustomMetricDefinition>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由一组定义创建目录，逐个走 `save` 的校验
    pub fn from_definitions<I>(definitions: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = CustomMetricDefinition>,
    {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.save(definition)?;
        }
        info!("自定义指标目录就绪，共 {} 个定义", catalog.len());
        Ok(catalog)
    }

    /// 按 codeName 读取
    pub fn get_by_code_name(&self, code_name: &str) -> Option<&CustomMetricDefinition> {
        self.definitions
            .values()
            .find(|definition| definition.code_name == code_name)
    }

    /// 全部定义，按 id 排序
    pub fn list(&self) -> impl Iterator<Item = &CustomMetricDefinition> {
        self.definitions.values()
    }

    /// 已启用的定义
    pub fn selected(&self) -> impl Iterator<Item = &CustomMetricDefinition> {
        self.list().filter(|definition| definition.selected)
    }

    /// 指定父级下的子定义
    pub fn children_of<'a>(
        &'a self,
        parent: &'a str,
    ) -> impl Iterator<Item = &'a CustomMetricDefinition> + 'a {
        self.list()
            .filter(move |definition| definition.parent.as_deref() == Some(parent))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// 下一个可用 id，始终为正数
    fn next_id(&self) -> Result<i32, CatalogError> {
        let max_id = self.definitions.keys().next_back().copied().unwrap_or(0);
        max_id.max(0).checked_add(1).ok_or(CatalogError::IdExhausted)
    }
}

impl CustomMetricProvider for InMemoryCatalog {
    fn get(&self, id: i32) -> Option<CustomMetricDefinition> {
        self.definitions.get(&id).cloned()
    }

    fn save(&mut self, mut definition: CustomMetricDefinition) -> Result<i32, CatalogError> {
        if definition.code_name.trim().is_empty() {
            return Err(CatalogError::EmptyCodeName);
        }
        // 0 表示新建，负数 id 不合法
        if definition.id < 0 {
            return Err(CatalogError::InvalidId { id: definition.id });
        }

        if let Some(owner) = self.get_by_code_name(&definition.code_name) {
            if owner.id != definition.id {
                return Err(CatalogError::DuplicateCodeName {
                    code_name: definition.code_name,
                    owner: owner.id,
                });
            }
        }

        if definition.is_new() {
            definition.id = self.next_id()?;
        }

        let id = definition.id;
        debug!("保存自定义指标 #{} '{}'", id, definition.code_name);
        self.definitions.insert(id, definition);
        Ok(id)
    }

    fn delete(&mut self, definition: &CustomMetricDefinition) -> Result<(), CatalogError> {
        self.definitions
            .remove(&definition.id)
            .map(|_| debug!("删除自定义指标 #{}", definition.id))
            .ok_or(CatalogError::NotFound { id: definition.id })
    }
}
