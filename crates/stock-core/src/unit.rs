//! 計量單位模型

use serde::{Deserialize, Serialize};

/// 計量單位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// 公斤
    MassKg,
    /// 公克
    MassG,
    /// 公升
    VolumeL,
    /// 毫升
    VolumeMl,
    /// 個（件）
    CountPiece,
    /// 份
    CountPortion,
}

/// 單位族
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitFamily {
    /// 質量
    Mass,
    /// 體積
    Volume,
    /// 計數
    Count,
}

impl Unit {
    /// 取得單位所屬的單位族
    pub fn family(&self) -> UnitFamily {
        match self {
            Unit::MassKg | Unit::MassG => UnitFamily::Mass,
            Unit::VolumeL | Unit::VolumeMl => UnitFamily::Volume,
            Unit::CountPiece | Unit::CountPortion => UnitFamily::Count,
        }
    }

    /// 檢查替代關係是否允許跨這兩個單位
    ///
    /// 僅允許相同單位，以及 kg↔g、L↔mL 兩組固定換算對；
    /// 計數單位只能與自己互換
    pub fn is_substitutable_with(&self, other: Unit) -> bool {
        if *self == other {
            return true;
        }
        matches!(
            (*self, other),
            (Unit::MassKg, Unit::MassG)
                | (Unit::MassG, Unit::MassKg)
                | (Unit::VolumeL, Unit::VolumeMl)
                | (Unit::VolumeMl, Unit::VolumeL)
        )
    }

    /// 單位符號
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::MassKg => "kg",
            Unit::MassG => "g",
            Unit::VolumeL => "L",
            Unit::VolumeMl => "mL",
            Unit::CountPiece => "pc",
            Unit::CountPortion => "portion",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
