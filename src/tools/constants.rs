//! 常量和默认配置集中管理
//!
//! 将所有重要常量集中定义，避免"默认值漂移"和重复定义

/// 物理换算常量
pub mod physics {
    /// 纳米到厘米
    pub const NM_TO_CM: f64 = 1e-7;

    /// TRIM深度列单位换算：埃到纳米
    pub const ANGSTROM_PER_NM: f64 = 10.0;

    /// TRIM能量列单位换算：eV到keV（与束流能量单位一致）
    pub const EV_PER_KEV: f64 = 1000.0;

    /// 深度间隔的系统不确定度占比（固定5%）
    pub const DEL_DEPTH_UNCERT_FRACTION: f64 = 0.05;
}

/// 参考样品alpha峰积分窗口 [low, high)
pub mod reference_peaks {
    /// alpha*（次同位素峰）窗口
    pub const ALPHA_STAR_WINDOW: (usize, usize) = (1791, 2142);

    /// alpha（主峰）窗口
    pub const ALPHA_WINDOW: (usize, usize) = (2291, 2592);
}

/// 参考标准默认值（硼标准）
pub mod reference_standard {
    /// 默认样品/参考核素
    pub const NUCLIDE: &str = "B";

    /// 分支比
    pub const BRANCH_FRACTION: f64 = 0.94;

    /// 参考面浓度 (atoms/cm²)
    pub const CONCENTRATION: f64 = 5.22e15;

    /// 参考面浓度不确定度 (atoms/cm²)
    pub const CONCENTRATION_UNCERT: f64 = 3e13;
}

/// 默认配置值
pub mod defaults {
    /// 默认分箱宽度（通道数）
    pub const BIN_WIDTH: usize = 21;

    /// 默认仪器参数文件名
    pub const INSTRUMENT_FILE: &str = "NDPInstrumParms.dat";

    /// 默认数据schema文件名
    pub const SCHEMA_FILE: &str = "NDPDataSchema.dat";

    /// 计数文件中通道数据起始行（0起）
    pub const COUNT_DATA_FIRST_LINE: usize = 8;

    /// TRIM文件头部行数
    pub const TRIM_HEADER_LINES: usize = 12;
}
