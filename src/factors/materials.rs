// ==========================================
// 建筑碳排放核算系统 - 建材排放因子表
// ==========================================
// 口径: A1-A3 隐含碳, kg CO2e / 单位
// 来源: AusLCI / ICE 常用值（用于估算, 项目 EPD 优先）
// ==========================================

use crate::factors::FactorEntry;

pub static MATERIAL_FACTORS: &[FactorEntry] = &[
    // ===== 混凝土与水泥 =====
    FactorEntry::new("concrete", "Concrete (general, 25-32 MPa)", 0.107, "kg"),
    FactorEntry::new("concrete40Mpa", "Concrete (40 MPa)", 0.138, "kg"),
    FactorEntry::new("lowCarbonConcrete", "Low carbon concrete (30% SCM)", 0.078, "kg"),
    FactorEntry::new("geopolymerConcrete", "Geopolymer concrete", 0.058, "kg"),
    FactorEntry::new("precastConcrete", "Precast concrete panel", 0.148, "kg"),
    FactorEntry::new("concreteBlock", "Concrete masonry block", 0.093, "kg"),
    FactorEntry::new("cement", "Portland cement (GP)", 0.912, "kg"),
    FactorEntry::new("blendedCement", "Blended cement (GB)", 0.606, "kg"),
    FactorEntry::new("aggregate", "Crushed aggregate", 0.0048, "kg"),
    FactorEntry::new("sand", "Sand", 0.0051, "kg"),
    // ===== 钢材与金属 =====
    FactorEntry::new("steel", "Steel (general)", 1.55, "kg"),
    FactorEntry::new("structuralSteel", "Structural steel sections", 1.72, "kg"),
    FactorEntry::new("reinforcingSteel", "Reinforcing bar", 1.99, "kg"),
    FactorEntry::new("recycledSteel", "Steel (EAF, recycled content)", 0.47, "kg"),
    FactorEntry::new("galvanisedSteel", "Galvanised steel sheet", 2.76, "kg"),
    FactorEntry::new("aluminium", "Aluminium (primary)", 9.16, "kg"),
    FactorEntry::new("recycledAluminium", "Aluminium (recycled)", 1.81, "kg"),
    FactorEntry::new("copper", "Copper pipe and wire", 3.81, "kg"),
    // ===== 木材 =====
    FactorEntry::new("timber", "Softwood timber (kiln dried)", 0.46, "kg"),
    FactorEntry::new("hardwood", "Hardwood timber", 0.39, "kg"),
    FactorEntry::new("clt", "Cross laminated timber", 0.437, "kg"),
    FactorEntry::new("glulam", "Glued laminated timber", 0.512, "kg"),
    FactorEntry::new("plywood", "Plywood", 0.681, "kg"),
    // ===== 砌体与饰面 =====
    FactorEntry::new("brick", "Clay brick", 0.24, "kg"),
    FactorEntry::new("ceramicTiles", "Ceramic tiles", 0.78, "kg"),
    FactorEntry::new("plasterboard", "Plasterboard", 0.39, "kg"),
    FactorEntry::new("fibreCementSheet", "Fibre cement sheet", 0.85, "kg"),
    // ===== 围护与保温 =====
    FactorEntry::new("glass", "Float glass", 1.44, "kg"),
    FactorEntry::new("doubleGlazing", "Double glazed unit", 28.0, "m2"),
    FactorEntry::new("insulation", "Glasswool insulation", 1.86, "kg"),
    FactorEntry::new("mineralWool", "Mineral wool insulation", 1.28, "kg"),
    FactorEntry::new("polystyrene", "Expanded polystyrene", 3.29, "kg"),
    FactorEntry::new("roofSheeting", "Coated steel roof sheeting", 2.82, "kg"),
    // ===== 其他 =====
    FactorEntry::new("asphalt", "Asphalt", 0.045, "kg"),
    FactorEntry::new("pvc", "PVC pipe", 3.10, "kg"),
    FactorEntry::new("carpet", "Nylon carpet", 5.43, "m2"),
];
